//! Manifest model and its JSON representation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::Span;
use crate::doctags::DocBlock;
use crate::error::{Error, Result};

/// File name used when the output path is a directory.
pub const DEFAULT_FILE_NAME: &str = "ast.json";

/// One documented operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocBlock>,
    #[serde(default)]
    pub valid: bool,
    /// Where the operation is declared. Unknown for shared-library entries.
    #[serde(skip)]
    pub span: Option<Span>,
}

impl Operation {
    /// Tagged `@public` in its doc block.
    pub fn is_public(&self) -> bool {
        self.docs.as_ref().map(|d| d.has_tag("public")).unwrap_or(false)
    }
}

/// The generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// The module's own public operations.
    pub operations: Vec<Operation>,
    /// Per local import, its public operations the module re-exposes.
    #[serde(default)]
    pub exports: Vec<Vec<Operation>>,
    /// Shared-library operations the module re-exposes.
    #[serde(default)]
    pub common: Vec<Operation>,
}

impl Manifest {
    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize and write in one step, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let write_err = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        fs::write(path, json).map_err(write_err)
    }

    /// Total operations across all sections.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
            + self.exports.iter().map(Vec::len).sum::<usize>()
            + self.common.len()
    }
}

/// Where to write: `path` itself, or `path/ast.json` for an existing directory.
pub fn output_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Only the `operations` field of a shared-library manifest is read.
///
/// Entries stay untyped here so one malformed entry cannot hide the rest.
#[derive(Deserialize)]
struct SharedManifest {
    #[serde(default)]
    operations: Vec<serde_json::Value>,
}

/// A shared-library entry that could not be read as an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// The entry's `name`, or `#index` when it has none.
    pub entry: String,
    pub reason: String,
}

/// Operations loaded from a shared-library manifest.
#[derive(Debug, Clone, Default)]
pub struct SharedOperations {
    pub operations: Vec<Operation>,
    pub skipped: Vec<SkippedEntry>,
}

/// Load the operations of a previously generated manifest.
///
/// The file itself must be JSON with an `operations` array. Individual
/// entries that do not deserialize are skipped and listed.
pub fn load_operations(path: &Path) -> Result<SharedOperations> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let shared: SharedManifest =
        serde_json::from_str(&content).map_err(|source| Error::InvalidManifest {
            path: path.to_path_buf(),
            source,
        })?;

    let mut loaded = SharedOperations::default();
    for (index, value) in shared.operations.into_iter().enumerate() {
        let entry = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));
        match serde_json::from_value::<Operation>(value) {
            Ok(operation) => loaded.operations.push(operation),
            Err(err) => loaded.skipped.push(SkippedEntry {
                entry,
                reason: err.to_string(),
            }),
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctags::{parse, ParseOptions};

    fn operation(name: &str, doc: Option<&str>) -> Operation {
        Operation {
            name: name.to_string(),
            params: vec!["a".to_string()],
            docs: doc.map(|d| parse(d, ParseOptions::lenient())),
            valid: true,
            span: None,
        }
    }

    #[test]
    fn test_is_public() {
        assert!(operation("a", Some("/** @public */")).is_public());
        assert!(!operation("b", Some("/** @param a */")).is_public());
        assert!(!operation("c", None).is_public());
    }

    #[test]
    fn test_json_shape_omits_missing_docs() {
        let manifest = Manifest {
            operations: vec![operation("a", None)],
            exports: vec![vec![]],
            common: vec![],
        };
        let json = manifest.to_json().unwrap();
        assert_eq!(
            json,
            "{\n  \"operations\": [\n    {\n      \"name\": \"a\",\n      \"params\": [\n        \"a\"\n      ],\n      \"valid\": true\n    }\n  ],\n  \"exports\": [\n    []\n  ],\n  \"common\": []\n}"
        );
    }

    #[test]
    fn test_write_and_load_operations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ast.json");
        let manifest = Manifest {
            operations: vec![operation("field", Some("/** @public\n * @param a */"))],
            ..Default::default()
        };

        manifest.write(&path).unwrap();
        let loaded = load_operations(&path).unwrap();
        assert_eq!(loaded.operations, manifest.operations);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_operations_accepts_structured_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ast.json");
        fs::write(
            &path,
            r#"{"operations": [
                {"name": "field", "params": ["key", "value"], "valid": true,
                 "docs": {"description": "Build a field.", "tags": [
                    {"title": "public"},
                    {"title": "param", "name": "key",
                     "type": {"type": "NameExpression", "name": "string"}}
                 ]}},
                {"name": "each", "params": ["path", "operation"], "valid": true}
            ]}"#,
        )
        .unwrap();

        let loaded = load_operations(&path).unwrap();
        let names: Vec<&str> = loaded.operations.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["field", "each"]);
        assert!(loaded.operations[0].is_public());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_operations_skips_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ast.json");
        fs::write(
            &path,
            r#"{"operations": [
                {"name": "field", "params": "key"},
                {"params": []},
                {"name": "each", "params": ["path", "operation"]}
            ]}"#,
        )
        .unwrap();

        let loaded = load_operations(&path).unwrap();
        assert_eq!(loaded.operations.len(), 1);
        assert_eq!(loaded.operations[0].name, "each");
        let skipped: Vec<&str> = loaded.skipped.iter().map(|s| s.entry.as_str()).collect();
        assert_eq!(skipped, vec!["field", "#1"]);
    }

    #[test]
    fn test_load_operations_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_operations(&missing), Err(Error::Read { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            load_operations(&broken),
            Err(Error::InvalidManifest { .. })
        ));
    }

    #[test]
    fn test_output_path_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(output_path(dir.path()), dir.path().join("ast.json"));

        let file = dir.path().join("manifest.json");
        assert_eq!(output_path(&file), file);
    }
}
