use reqstool_core::archive::verify_archive;
use reqstool_core::project::{ARTIFACT_CLASSIFIER, ARTIFACT_TYPE};
use reqstool_core::{
    execute, ArtifactAttacher, AttachedArtifact, ConfigFile, PackError, PackOutcome, PackResult,
    RecordingAttacher, StaticProject,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write(root: &Path, rel: &str, content: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, content).unwrap();
}

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/yml")
        .join(name);
    fs::read_to_string(path).unwrap()
}

/// A project laid out the way the upstream scanners leave it.
fn seeded_project() -> (tempfile::TempDir, StaticProject) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "reqstool/requirements.yml", "requirements: []\n");
    write(
        root,
        "target/generated-sources/annotations/resources/annotations.yml",
        &fixture("requirements_annotations.yml"),
    );
    write(
        root,
        "target/generated-test-sources/test-annotations/resources/annotations.yml",
        &fixture("svcs_annotations.yml"),
    );
    write(root, "test_results/surefire/TEST-CalculatorTest.xml", "<testsuite/>");
    let project = StaticProject::new("calculator-1.0.0", root, "1.0.0");
    (dir, project)
}

#[test]
fn full_run_writes_annotations_assembles_and_attaches() {
    let (dir, project) = seeded_project();
    let config = ConfigFile::default().resolve(dir.path(), None);
    let mut attacher = RecordingAttacher::default();

    let outcome = execute(&config, &project, &mut attacher).unwrap();
    let PackOutcome::Packaged(report) = outcome else {
        panic!("expected a packaged outcome");
    };

    let annotations = fs::read_to_string(&report.annotations).unwrap();
    assert!(annotations.ends_with(&fixture("combined_annotations.yml")));

    let archive = report.archive.unwrap();
    assert_eq!(
        archive,
        dir.path().join("target/reqstool/calculator-1.0.0-reqstool.zip")
    );
    let verified = verify_archive(fs::File::open(&archive).unwrap()).unwrap();
    assert_eq!(verified.test_results, ["TEST-CalculatorTest.xml"]);
    assert_eq!(verified.manifest.resources.annotations.as_deref(), Some("annotations.yml"));

    assert_eq!(attacher.attached.len(), 1);
    let attached = &attacher.attached[0];
    assert_eq!(attached.kind, ARTIFACT_TYPE);
    assert_eq!(attached.classifier, ARTIFACT_CLASSIFIER);
    assert_eq!(attached.path, archive);
    assert_eq!(report.attached.as_ref(), Some(attached));
}

#[test]
fn skip_does_nothing() {
    let (dir, project) = seeded_project();
    let mut config = ConfigFile::default().resolve(dir.path(), None);
    config.skip = true;
    let mut attacher = RecordingAttacher::default();

    assert_eq!(
        execute(&config, &project, &mut attacher).unwrap(),
        PackOutcome::Skipped
    );
    assert!(!config.output_directory.exists());
    assert!(attacher.attached.is_empty());
}

#[test]
fn skip_assemble_still_writes_annotations() {
    let (dir, project) = seeded_project();
    let mut config = ConfigFile::default().resolve(dir.path(), None);
    config.skip_assemble = true;
    let mut attacher = RecordingAttacher::default();

    let PackOutcome::Packaged(report) = execute(&config, &project, &mut attacher).unwrap() else {
        panic!("expected a packaged outcome");
    };
    assert!(report.annotations.is_file());
    assert_eq!(report.archive, None);
    // Nothing to attach without an archive.
    assert_eq!(report.attached, None);
    assert!(attacher.attached.is_empty());
}

#[test]
fn skip_attach_keeps_archive_local() {
    let (dir, project) = seeded_project();
    let mut config = ConfigFile::default().resolve(dir.path(), None);
    config.skip_attach = true;
    let mut attacher = RecordingAttacher::default();

    let PackOutcome::Packaged(report) = execute(&config, &project, &mut attacher).unwrap() else {
        panic!("expected a packaged outcome");
    };
    assert!(report.archive.unwrap().is_file());
    assert!(attacher.attached.is_empty());
}

#[test]
fn missing_dataset_fails_after_annotations_are_written() {
    let (dir, project) = seeded_project();
    fs::remove_file(dir.path().join("reqstool/requirements.yml")).unwrap();
    let config = ConfigFile::default().resolve(dir.path(), None);
    let mut attacher = RecordingAttacher::default();

    let err = execute(&config, &project, &mut attacher).unwrap_err();
    assert!(matches!(err, PackError::MissingMandatory { .. }));
    assert!(config.annotations_output().is_file());
    assert!(!config
        .output_directory
        .join("calculator-1.0.0-reqstool.zip")
        .exists());
}

struct RefusingAttacher;

impl ArtifactAttacher for RefusingAttacher {
    fn attach(&mut self, artifact: &AttachedArtifact) -> PackResult<()> {
        Err(PackError::Attach {
            message: format!("read-only artifact set: {}", artifact.path.display()),
        })
    }
}

#[test]
fn attach_failure_propagates() {
    let (dir, project) = seeded_project();
    let config = ConfigFile::default().resolve(dir.path(), None);
    let err = execute(&config, &project, &mut RefusingAttacher).unwrap_err();
    assert!(matches!(err, PackError::Attach { .. }));
}

#[test]
fn custom_patterns_and_tags_flow_into_manifest() {
    let (dir, project) = seeded_project();
    write(dir.path(), "build/test-results/test/TEST-a.xml", "<testsuite/>");
    let file: ConfigFile = serde_yaml::from_str(
        "test_results:\n  - build/test-results/**/*.xml\nlanguage: java\nbuild: gradle\n",
    )
    .unwrap();
    let config = file.resolve(dir.path(), None);
    let mut attacher = RecordingAttacher::default();

    let PackOutcome::Packaged(report) = execute(&config, &project, &mut attacher).unwrap() else {
        panic!("expected a packaged outcome");
    };
    let archive: PathBuf = report.archive.unwrap();
    let verified = verify_archive(fs::File::open(archive).unwrap()).unwrap();
    assert_eq!(verified.test_results, ["TEST-a.xml"]);
    assert_eq!(verified.manifest.build, "gradle");
    assert_eq!(
        verified.manifest.resources.test_results,
        Some(vec!["build/test-results/**/*.xml".to_string()])
    );
}
