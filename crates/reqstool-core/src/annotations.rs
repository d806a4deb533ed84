//! Annotation tree combiner.
//!
//! The source-code and test-code scanners each emit a partial document of the
//! shape
//!
//! ```yaml
//! requirement_annotations:
//!   implementations: { ... }   # from the source scan
//!   tests: { ... }             # from the test scan
//! ```
//!
//! [`combine`] merges the `implementations` subtree of the first and the
//! `tests` subtree of the second into one [`AnnotationDocument`]. The subtrees
//! are opaque: only their emptiness is inspected.

use crate::errors::{IoResultExt, PackError, PackResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// Root key of an annotation document.
pub const REQUIREMENT_ANNOTATIONS: &str = "requirement_annotations";
/// Child key holding source-code annotations.
pub const IMPLEMENTATIONS: &str = "implementations";
/// Child key holding test-code annotations.
pub const TESTS: &str = "tests";
/// File name of the merged document, in the output directory and the archive.
pub const ANNOTATIONS_FILE_NAME: &str = "annotations.yml";
/// Schema-reference comment written as the first line of the merged document.
pub const ANNOTATIONS_SCHEMA_COMMENT: &str = "# yaml-language-server: $schema=https://raw.githubusercontent.com/reqstool/reqstool-client/main/src/reqstool/resources/schemas/v1/annotations.schema.json";

/// Merged annotation document.
///
/// Field order is the serialization order, so output is stable for identical
/// input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub requirement_annotations: RequirementAnnotations,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementations: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Value>,
}

/// Merge two partial subtrees into a new document.
///
/// A child key is present only if its input is a non-empty mapping or
/// sequence. Null, missing, empty and scalar inputs are omitted.
pub fn combine(implementations: Value, tests: Value) -> AnnotationDocument {
    AnnotationDocument {
        requirement_annotations: RequirementAnnotations {
            implementations: non_empty(implementations),
            tests: non_empty(tests),
        },
    }
}

fn non_empty(tree: Value) -> Option<Value> {
    if is_empty_tree(&tree) {
        None
    } else {
        Some(tree)
    }
}

/// True unless the value is a mapping or sequence with at least one element.
pub fn is_empty_tree(tree: &Value) -> bool {
    match tree {
        Value::Mapping(m) => m.is_empty(),
        Value::Sequence(s) => s.is_empty(),
        Value::Tagged(t) => is_empty_tree(&t.value),
        _ => true,
    }
}

/// Extract `requirement_annotations.<child>` from an already parsed document.
pub fn subtree(document: &Value, child: &str) -> Value {
    document
        .get(REQUIREMENT_ANNOTATIONS)
        .and_then(|root| root.get(child))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Read an upstream annotation document and return one of its subtrees.
///
/// An absent or blank file yields `Value::Null`; a file that is present but
/// not valid YAML is an error.
pub fn read_subtree(path: &Path, child: &str) -> PackResult<Value> {
    if !path.exists() {
        tracing::debug!("annotation file not found, treating as empty: {}", path.display());
        return Ok(Value::Null);
    }
    let raw = std::fs::read_to_string(path).with_path("failed to read", path)?;
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    let document: Value = serde_yaml::from_str(&raw).map_err(|e| PackError::yaml(path, e))?;
    Ok(subtree(&document, child))
}

/// Serialize the document body (without the schema comment).
pub fn to_yaml_string(document: &AnnotationDocument) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

/// Write the merged document, prefixed with the schema-reference comment.
///
/// Parent directories are created as needed.
pub fn write_annotations(path: &Path, document: &AnnotationDocument) -> PackResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_path("failed to create directory", parent)?;
        }
    }
    let body = to_yaml_string(document).map_err(|e| PackError::yaml(path, e))?;
    let mut out = String::with_capacity(ANNOTATIONS_SCHEMA_COMMENT.len() + 1 + body.len());
    out.push_str(ANNOTATIONS_SCHEMA_COMMENT);
    out.push('\n');
    out.push_str(&body);
    std::fs::write(path, out).with_path("failed to write", path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn both_subtrees_present_in_schema_order() {
        let doc = combine(yaml("REQ_001: [a]"), yaml("REQ_001: [b]"));
        let out = to_yaml_string(&doc).unwrap();
        let impl_pos = out.find("implementations:").unwrap();
        let tests_pos = out.find("tests:").unwrap();
        assert!(out.starts_with("requirement_annotations:\n"));
        assert!(impl_pos < tests_pos);
    }

    #[test]
    fn empty_subtrees_are_omitted() {
        let doc = combine(Value::Null, yaml("{}"));
        assert_eq!(doc.requirement_annotations.implementations, None);
        assert_eq!(doc.requirement_annotations.tests, None);
        assert_eq!(to_yaml_string(&doc).unwrap(), "requirement_annotations: {}\n");
    }

    #[test]
    fn scalar_subtree_counts_as_empty() {
        assert!(is_empty_tree(&yaml("just a string")));
        assert!(is_empty_tree(&yaml("[]")));
        assert!(!is_empty_tree(&yaml("[1]")));
    }

    #[test]
    fn subtree_of_unrelated_document_is_null() {
        let doc = yaml("something_else:\n  tests:\n    A: [1]\n");
        assert_eq!(subtree(&doc, TESTS), Value::Null);
        let doc = yaml("requirement_annotations:\n  tests:\n    A: [1]\n");
        assert_eq!(subtree(&doc, IMPLEMENTATIONS), Value::Null);
        assert!(!is_empty_tree(&subtree(&doc, TESTS)));
    }

    #[test]
    fn read_subtree_absent_and_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yml");
        assert_eq!(read_subtree(&missing, TESTS).unwrap(), Value::Null);

        let blank = dir.path().join("blank.yml");
        std::fs::write(&blank, "  \n").unwrap();
        assert_eq!(read_subtree(&blank, TESTS).unwrap(), Value::Null);
    }

    #[test]
    fn read_subtree_rejects_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.yml");
        std::fs::write(&bad, "requirement_annotations: [unclosed\n").unwrap();
        let err = read_subtree(&bad, TESTS).unwrap_err();
        assert!(matches!(err, PackError::Yaml { .. }));
    }

    #[test]
    fn write_annotations_prefixes_schema_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/annotations.yml");
        let doc = combine(yaml("REQ_001: [x]"), Value::Null);
        write_annotations(&path, &doc).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some(ANNOTATIONS_SCHEMA_COMMENT));
        assert_eq!(lines.next(), Some("requirement_annotations:"));
        assert!(!written.contains("tests:"));
    }
}
