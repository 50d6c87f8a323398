//! Human-readable nested rendering for trees and plans.

use std::fmt;

use termtree::Tree;

use crate::domain::classify::{classify, NodeKind};
use crate::domain::plan::{Plan, PlanNode};
use crate::domain::tree::TreeNode;

pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for TreeNode {
    fn to_term_tree(&self) -> Tree<String> {
        let label = match classify(self) {
            NodeKind::Leaf => format!("$ {}", self.name),
            NodeKind::Option { index, label } => format!("{} [option {}: {}]", self.name, index, label),
            NodeKind::Section => self.name.clone(),
        };
        Tree::new(label).with_leaves(self.children.iter().map(|c| c.to_term_tree()))
    }
}

impl ToTermTree for PlanNode {
    fn to_term_tree(&self) -> Tree<String> {
        match self {
            PlanNode::Task { command } => Tree::new(format!("task: {}", command)),
            PlanNode::Sequence { title, steps } => Tree::new(format!("sequence: {}", title))
                .with_leaves(steps.iter().map(|s| s.to_term_tree())),
            PlanNode::Choice {
                title,
                alternatives,
            } => Tree::new(format!("choice: {}", title)).with_leaves(alternatives.iter().map(|a| {
                Tree::new(format!("[{}] {}", a.index, a.label)).with_leaves([a.body.to_term_tree()])
            })),
        }
    }
}

impl ToTermTree for Plan {
    fn to_term_tree(&self) -> Tree<String> {
        Tree::new(format!("plan: {}", self.input)).with_leaves([self.root.to_term_tree()])
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_term_tree())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_term_tree())
    }
}
