//! Attachment for hosts that drive the CLI.
//!
//! The host build reads one JSON line per attached artifact from stdout:
//!
//! ```json
//! {"type":"zip","classifier":"reqstool","path":"target/reqstool/app-1.0-reqstool.zip","sha256":"sha256:..."}
//! ```

use reqstool_core::{ArtifactAttacher, AttachedArtifact, PackError, PackResult};
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::Path;

pub(crate) struct JsonLineAttacher<W: Write> {
    out: W,
}

impl<W: Write> JsonLineAttacher<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ArtifactAttacher for JsonLineAttacher<W> {
    fn attach(&mut self, artifact: &AttachedArtifact) -> PackResult<()> {
        let digest = file_sha256(&artifact.path).map_err(|e| PackError::Attach {
            message: format!("failed to hash {}: {e}", artifact.path.display()),
        })?;
        let record = serde_json::json!({
            "type": artifact.kind,
            "classifier": artifact.classifier,
            "path": artifact.path.to_string_lossy(),
            "sha256": digest,
        });
        writeln!(self.out, "{record}")
            .and_then(|_| self.out.flush())
            .map_err(|e| PackError::Attach {
                message: format!("failed to write attachment record: {e}"),
            })
    }
}

fn file_sha256(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("sha256:{}", hex::encode(Sha256::digest(&bytes))))
}
