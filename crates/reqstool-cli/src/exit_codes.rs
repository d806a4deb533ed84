//! Process exit codes.
//! These codes are part of the public contract for build pipelines invoking the CLI.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PACKAGING_FAILED: i32 = 1; // I/O, archive or attachment failure
pub const EXIT_CONFIG_ERROR: i32 = 2; // Missing mandatory input, bad pattern or config file
