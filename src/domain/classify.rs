//! Node classification: leaf, option or plain section.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::tree::TreeNode;

/// Role of a tree node, decided from its own name and children only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// No children: the name is a command
    Leaf,
    /// `Option <N>: <label>` with children: one alternative of a choice
    Option { index: u32, label: &'a str },
    /// Any other node with children
    Section,
}

impl NodeKind<'_> {
    pub fn is_option(&self) -> bool {
        matches!(self, NodeKind::Option { .. })
    }
}

fn option_regex() -> &'static Regex {
    static OPTION_REGEX: OnceLock<Regex> = OnceLock::new();
    OPTION_REGEX.get_or_init(|| Regex::new(r"^Option\s+(\d+):\s*(.+)$").unwrap())
}

/// Parses an `Option <N>: <label>` title.
///
/// Returns `None` unless N is a positive integer fitting `u32` and the
/// trimmed label is non-empty.
pub fn parse_option_title(name: &str) -> Option<(u32, &str)> {
    let caps = option_regex().captures(name)?;
    let index: u32 = caps.get(1)?.as_str().parse().ok()?;
    let label = caps.get(2)?.as_str().trim();
    if index == 0 || label.is_empty() {
        return None;
    }
    Some((index, label))
}

/// Classifies a node without looking at its siblings.
pub fn classify(node: &TreeNode) -> NodeKind<'_> {
    if node.is_leaf() {
        return NodeKind::Leaf;
    }
    match parse_option_title(&node.name) {
        Some((index, label)) => NodeKind::Option { index, label },
        None => NodeKind::Section,
    }
}
