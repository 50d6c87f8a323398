//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::tree::NodePath;

/// Compile errors abort the whole compilation; no partial plan is returned.
///
/// Every variant names the offending node and its position in the forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("empty container: '{name}' at {path} has no members")]
    EmptyContainer { name: String, path: NodePath },

    #[error(
        "mixed sibling kinds under '{name}' at {path}: '{offender}' breaks uniformity \
         ({options} option(s), {others} other node(s))"
    )]
    MixedSiblingKind {
        name: String,
        path: NodePath,
        offender: String,
        options: usize,
        others: usize,
    },

    #[error("duplicate option index {index}: '{name}' at {path}")]
    DuplicateOptionIndex {
        name: String,
        path: NodePath,
        index: u32,
    },

    #[error("malformed tree: '{name}' at {path}: {reason}")]
    MalformedTree {
        name: String,
        path: NodePath,
        reason: String,
    },
}

impl CompileError {
    /// Name of the node the error was raised for.
    pub fn name(&self) -> &str {
        match self {
            CompileError::EmptyContainer { name, .. }
            | CompileError::MixedSiblingKind { name, .. }
            | CompileError::DuplicateOptionIndex { name, .. }
            | CompileError::MalformedTree { name, .. } => name,
        }
    }

    /// Position of the offending node.
    pub fn path(&self) -> &NodePath {
        match self {
            CompileError::EmptyContainer { path, .. }
            | CompileError::MixedSiblingKind { path, .. }
            | CompileError::DuplicateOptionIndex { path, .. }
            | CompileError::MalformedTree { path, .. } => path,
        }
    }
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
