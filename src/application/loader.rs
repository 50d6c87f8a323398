//! Tree documents: serialized section forests standing in for parsed guidebooks
//!
//! Accepted layouts:
//! - JSON: `{"tree": [{"name": ..., "children": [...]}]}` or a bare array of nodes
//! - TOML: `[[tree]]` tables with nested `[[tree.children]]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Input, TreeNode, TreeSourceError};
use crate::infrastructure::traits::FileSystem;

/// On-disk encoding of a tree document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn parse(self, content: &str) -> Result<GuidebookDocument, String> {
        match self {
            // A bare array is the forest itself; anything else must be the wrapped form.
            Self::Json if content.trim_start().starts_with('[') => {
                serde_json::from_str::<Vec<TreeNode>>(content)
                    .map(|tree| GuidebookDocument { tree })
                    .map_err(|e| e.to_string())
            }
            Self::Json => {
                serde_json::from_str::<GuidebookDocument>(content).map_err(|e| e.to_string())
            }
            Self::Toml => toml::from_str::<GuidebookDocument>(content).map_err(|e| e.to_string()),
        }
    }
}

/// Root forest of a tree document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidebookDocument {
    pub tree: Vec<TreeNode>,
}

/// Reads tree documents through the [`FileSystem`] boundary.
pub struct GuidebookLoader {
    fs: Arc<dyn FileSystem>,
}

impl GuidebookLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a document immediately.
    pub fn load(&self, path: &Path) -> ApplicationResult<GuidebookDocument> {
        let format = self.check(path)?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree document", path)?;
        format
            .parse(&content)
            .map_err(|message| ApplicationError::InvalidDocument {
                path: path.to_path_buf(),
                message,
            })
    }

    /// Build a compile input whose forest is read only when the compiler asks for it.
    ///
    /// Format and existence are checked up front; read or parse failures
    /// surface later as a malformed tree.
    pub fn input_for(&self, path: &Path) -> ApplicationResult<Input> {
        let format = self.check(path)?;
        let fs = Arc::clone(&self.fs);
        let source: PathBuf = path.to_path_buf();
        debug!("input_for: deferred load of {}", source.display());

        Ok(Input::new(path.display().to_string(), move || {
            let content = fs
                .read_to_string(&source)
                .map_err(|e| TreeSourceError::new(format!("read {}: {}", source.display(), e)))?;
            format
                .parse(&content)
                .map(|doc| doc.tree)
                .map_err(|e| TreeSourceError::new(format!("parse {}: {}", source.display(), e)))
        }))
    }

    fn check(&self, path: &Path) -> ApplicationResult<DocumentFormat> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))?;
        if !self.fs.is_file(path) {
            return Err(ApplicationError::DocumentNotFound(path.to_path_buf()));
        }
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_bare_json_array_when_parse_then_forest() {
        let doc = DocumentFormat::Json
            .parse(r#"[{"name": "S", "children": [{"name": "echo a"}]}]"#)
            .unwrap();
        assert_eq!(
            doc.tree,
            vec![TreeNode::section("S", vec![TreeNode::leaf("echo a")])]
        );
    }

    #[test]
    fn given_misspelled_field_when_parse_json_then_error_names_field_and_position() {
        let err = DocumentFormat::Json
            .parse(r#"{"tree":[{"name":"S","children":[{"nmae":"x"}]}]}"#)
            .unwrap_err();
        assert!(err.contains("missing field `name`"), "got: {}", err);
        assert!(err.contains("line 1"), "got: {}", err);
    }

    #[test]
    fn given_bare_array_with_bad_node_when_parse_json_then_error_names_field() {
        let err = DocumentFormat::Json
            .parse("  [{\"title\": \"S\"}]")
            .unwrap_err();
        assert!(err.contains("missing field `name`"), "got: {}", err);
    }

    #[test]
    fn given_toml_tables_when_parse_then_nested_forest() {
        let content = r#"
[[tree]]
name = "Setup"

[[tree.children]]
name = "echo one"

[[tree.children]]
name = "echo two"
"#;
        let doc = DocumentFormat::Toml.parse(content).unwrap();
        assert_eq!(doc.tree.len(), 1);
        assert_eq!(doc.tree[0].leaf_nodes(), vec!["echo one", "echo two"]);
    }

    #[test]
    fn given_unknown_extension_when_detecting_then_none() {
        assert_eq!(DocumentFormat::from_path(Path::new("guide.md")), None);
        assert_eq!(
            DocumentFormat::from_path(Path::new("guide.JSON")),
            Some(DocumentFormat::Json)
        );
    }
}
