//! Tree model: the section hierarchy handed to the compiler.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named guidebook section, or a leaf command when it has no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Section title, or the literal command text for a leaf
    pub name: String,
    /// Ordered child nodes, empty for a leaf
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Leaf node carrying a shell command.
    pub fn leaf(command: impl Into<String>) -> Self {
        Self {
            name: command.into(),
            children: Vec::new(),
        }
    }

    /// Section node with ordered children.
    pub fn section(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Collects leaf names (commands) in document order.
    pub fn leaf_nodes(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        if self.is_leaf() {
            leaves.push(&self.name);
        } else {
            for child in &self.children {
                child.collect_leaves(leaves);
            }
        }
    }
}

/// Position of a node: child indices from the forest root.
///
/// Displays as `/0/1/0`; the forest itself is `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.iter().join("/"))
    }
}

/// Failure reported by a tree producer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TreeSourceError {
    pub message: String,
}

impl TreeSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deferred root forest; invoked once per compilation.
pub type TreeProducer = Box<dyn FnOnce() -> Result<Vec<TreeNode>, TreeSourceError> + Send>;

/// Compilation input: a source identifier plus a lazily produced forest.
pub struct Input {
    /// Identifies the source document, used for diagnostics only
    pub input: String,
    tree: TreeProducer,
}

impl Input {
    pub fn new<F>(input: impl Into<String>, tree: F) -> Self
    where
        F: FnOnce() -> Result<Vec<TreeNode>, TreeSourceError> + Send + 'static,
    {
        Self {
            input: input.into(),
            tree: Box::new(tree),
        }
    }

    /// Input over an already built forest.
    pub fn from_forest(input: impl Into<String>, forest: Vec<TreeNode>) -> Self {
        Self::new(input, move || Ok(forest))
    }

    /// Splits the input, handing out the producer to be called once.
    pub fn into_parts(self) -> (String, TreeProducer) {
        (self.input, self.tree)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_sections_when_depth_then_counts_levels() {
        let tree = TreeNode::section(
            "root",
            vec![
                TreeNode::leaf("echo a"),
                TreeNode::section("inner", vec![TreeNode::leaf("echo b")]),
            ],
        );

        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_nodes(), vec!["echo a", "echo b"]);
    }

    #[test]
    fn given_node_path_when_display_then_slash_separated() {
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(NodePath::root().child(0).child(2).to_string(), "/0/2");
    }

    #[test]
    fn given_json_without_children_when_deserializing_then_leaf() {
        let node: TreeNode = serde_json::from_str(r#"{"name": "echo hi"}"#).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.name, "echo hi");
    }
}
