//! Determinism tests for the archive format.
//!
//! Re-running assembly with unchanged inputs must produce byte-identical
//! archives, independent of file modification times.

use reqstool_core::archive::{assemble, write_archive, AssembleRequest};
use reqstool_core::manifest::ManifestMetadata;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, SystemTime};

fn write(root: &Path, rel: &str, content: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, content).unwrap();
}

fn request(root: &Path) -> AssembleRequest {
    AssembleRequest {
        dataset_dir: root.join("reqstool"),
        project_root: root.to_path_buf(),
        output_dir: root.join("out"),
        final_name: "determinism-0.1.0".into(),
        annotations_file: root.join("out/annotations.yml"),
        test_result_patterns: vec!["test_results/**/*.xml".into()],
        manifest: ManifestMetadata::new("0.1.0"),
    }
}

fn seed(root: &Path) {
    write(root, "reqstool/requirements.yml", "requirements:\n  - id: REQ_001\n");
    write(root, "reqstool/software_verification_cases.yml", "cases:\n  - id: SVC_001\n");
    write(root, "out/annotations.yml", "requirement_annotations: {}\n");
    for (i, dir) in ["zeta", "alpha", "mid"].iter().enumerate() {
        write(
            root,
            &format!("test_results/{dir}/TEST-{i}.xml"),
            &format!("<testsuite tests=\"{i}\"/>"),
        );
    }
}

fn sha256_file(path: &Path) -> String {
    hex::encode(Sha256::digest(fs::read(path).unwrap()))
}

#[test]
fn assembling_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let req = request(dir.path());

    let path = assemble(&req).unwrap();
    let first = sha256_file(&path);

    // Touch an input so only its mtime changes.
    let requirements = dir.path().join("reqstool/requirements.yml");
    let file = fs::File::options().write(true).open(&requirements).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(3600))
        .unwrap();
    drop(file);

    let path = assemble(&req).unwrap();
    assert_eq!(sha256_file(&path), first, "archives must be byte-identical");
}

#[test]
fn separate_trees_with_same_content_match() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    seed(a.path());
    seed(b.path());

    let mut buf_a = Cursor::new(Vec::new());
    let mut buf_b = Cursor::new(Vec::new());
    let summary_a = write_archive(&mut buf_a, &request(a.path())).unwrap();
    let summary_b = write_archive(&mut buf_b, &request(b.path())).unwrap();

    assert_eq!(summary_a.entries, summary_b.entries);
    assert_eq!(buf_a.into_inner(), buf_b.into_inner());
}

#[test]
fn test_results_are_ordered_by_relative_path() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let summary = write_archive(Cursor::new(Vec::new()), &request(dir.path())).unwrap();

    let relative: Vec<_> = summary
        .test_results
        .iter()
        .map(|m| m.relative.as_str())
        .collect();
    assert_eq!(
        relative,
        [
            "test_results/alpha/TEST-1.xml",
            "test_results/mid/TEST-2.xml",
            "test_results/zeta/TEST-0.xml",
        ]
    );
    assert_eq!(
        summary.entries.last().map(String::as_str),
        Some("determinism-0.1.0-reqstool/reqstool_config.yml")
    );
}
