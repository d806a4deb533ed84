use crate::errors::{IoResultExt, PackError, PackResult};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub(crate) fn create_deterministic_zip<W: Write + Seek>(writer: W) -> ZipWriter<W> {
    ZipWriter::new(writer)
}

/// Fixed per-entry metadata: no wall-clock time, no host permissions.
fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

pub(crate) fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    data: &[u8],
) -> PackResult<()> {
    zip.start_file(path, entry_options())
        .map_err(|e| PackError::archive(format!("failed to start entry {path}"), e))?;
    zip.write_all(data)
        .map_err(|e| PackError::io(format!("failed to write entry {path}"), e))?;
    Ok(())
}

/// Stream a file from disk into a new entry. Returns the number of bytes copied.
pub(crate) fn copy_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    source: &Path,
) -> PackResult<u64> {
    let mut file = File::open(source).with_path("failed to open", source)?;
    let len = file.metadata().with_path("failed to stat", source)?.len();
    let options = entry_options().large_file(len >= u64::from(u32::MAX));
    zip.start_file(path, options)
        .map_err(|e| PackError::archive(format!("failed to start entry {path}"), e))?;
    std::io::copy(&mut file, zip).with_path("failed to copy", source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    #[test]
    fn entries_carry_fixed_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("requirements.yml");
        std::fs::write(&source, "requirements: []\n").unwrap();

        let mut zip = create_deterministic_zip(Cursor::new(Vec::new()));
        write_entry(&mut zip, "top/a.yml", b"a: 1\n").unwrap();
        let copied = copy_entry(&mut zip, "top/requirements.yml", &source).unwrap();
        assert_eq!(copied, 17);
        let out = zip.finish().unwrap();

        let mut archive = ZipArchive::new(out).unwrap();
        for i in 0..archive.len() {
            let entry = archive.by_index(i).unwrap();
            assert_eq!(entry.compression(), CompressionMethod::Deflated);
            assert_eq!(entry.last_modified(), Some(DateTime::default()));
            assert_eq!(entry.unix_mode().map(|m| m & 0o777), Some(0o644));
        }
    }

    #[test]
    fn copy_of_missing_source_names_the_path() {
        let mut zip = create_deterministic_zip(Cursor::new(Vec::new()));
        let err = copy_entry(&mut zip, "top/x.xml", Path::new("/nonexistent/x.xml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/x.xml"));
    }
}
