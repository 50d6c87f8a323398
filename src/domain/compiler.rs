//! Plan compiler: turns a guidebook section forest into a plan.
//!
//! Per node:
//! - leaf → task carrying the command
//! - section whose children are all options → choice, one alternative each
//! - any other section → sequence over its children
//!
//! Sibling order is preserved everywhere. Single-child sections are never
//! flattened, and an option node only ever appears as the body of its
//! parent's choice.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::domain::classify::{classify, NodeKind};
use crate::domain::error::{CompileError, CompileResult};
use crate::domain::plan::{Alternative, Plan, PlanNode};
use crate::domain::tree::{Input, NodePath, TreeNode};

/// Default nesting limit for a single compilation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for [`PlanCompiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Deepest allowed node nesting, the forest's roots being level 1
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Stateless compiler; safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct PlanCompiler {
    options: CompileOptions,
}

impl PlanCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Compiles an input, invoking its tree producer exactly once.
    #[instrument(level = "debug", skip(self))]
    pub fn compile(&self, input: Input) -> CompileResult<Plan> {
        let (name, produce) = input.into_parts();
        let forest = produce().map_err(|e| CompileError::MalformedTree {
            name: name.clone(),
            path: NodePath::root(),
            reason: format!("tree producer failed: {}", e),
        })?;
        debug!("compile: input={} roots={}", name, forest.len());

        let root = self.compile_forest(&name, &forest)?;
        Ok(Plan { input: name, root })
    }

    /// Compiles a root forest titled `title`.
    ///
    /// A single non-option root compiles to its own plan node. Otherwise the
    /// forest behaves like an untitled section: a sequence over the roots, or
    /// a choice when every root is an option.
    pub fn compile_forest(&self, title: &str, forest: &[TreeNode]) -> CompileResult<PlanNode> {
        let path = NodePath::root();
        match forest {
            [single] if !classify(single).is_option() => {
                self.compile_node(single, &path.child(0), 1)
            }
            roots => self.compile_children(title, roots, &path, 1),
        }
    }

    fn compile_node(&self, node: &TreeNode, path: &NodePath, depth: usize) -> CompileResult<PlanNode> {
        if depth > self.options.max_depth {
            return Err(CompileError::MalformedTree {
                name: node.name.clone(),
                path: path.clone(),
                reason: format!("nesting exceeds max depth {}", self.options.max_depth),
            });
        }

        match classify(node) {
            NodeKind::Leaf => {
                trace!("task at {}: {}", path, node.name);
                Ok(PlanNode::task(node.name.as_str()))
            }
            // An option's body compiles exactly like a section's children.
            NodeKind::Section | NodeKind::Option { .. } => {
                self.compile_children(&node.name, &node.children, path, depth + 1)
            }
        }
    }

    /// Compiles the children of the group at `path` (a section, an option
    /// body or the forest itself) into a sequence or a choice.
    fn compile_children(
        &self,
        title: &str,
        children: &[TreeNode],
        path: &NodePath,
        depth: usize,
    ) -> CompileResult<PlanNode> {
        if children.is_empty() {
            return Err(CompileError::EmptyContainer {
                name: title.to_string(),
                path: path.clone(),
            });
        }

        let kinds: Vec<NodeKind<'_>> = children.iter().map(classify).collect();
        let options = kinds.iter().filter(|k| k.is_option()).count();

        if options == 0 {
            let steps = children
                .iter()
                .enumerate()
                .map(|(i, child)| self.compile_node(child, &path.child(i), depth))
                .collect::<CompileResult<Vec<_>>>()?;
            trace!("sequence at {}: {} step(s)", path, steps.len());
            return Ok(PlanNode::sequence(title, steps));
        }

        if options != children.len() {
            let first_is_option = kinds[0].is_option();
            let offender = kinds
                .iter()
                .position(|k| k.is_option() != first_is_option)
                .map(|i| children[i].name.clone())
                .unwrap_or_default();
            return Err(CompileError::MixedSiblingKind {
                name: title.to_string(),
                path: path.clone(),
                offender,
                options,
                others: children.len() - options,
            });
        }

        // Reject duplicates before descending so the shallowest error wins.
        let mut seen: HashMap<u32, usize> = HashMap::new();
        for (i, kind) in kinds.iter().enumerate() {
            if let NodeKind::Option { index, .. } = kind {
                if seen.insert(*index, i).is_some() {
                    return Err(CompileError::DuplicateOptionIndex {
                        name: children[i].name.clone(),
                        path: path.child(i),
                        index: *index,
                    });
                }
            }
        }

        let mut alternatives = Vec::with_capacity(children.len());
        for (i, (child, kind)) in children.iter().zip(&kinds).enumerate() {
            if let NodeKind::Option { index, label } = kind {
                let body = self.compile_node(child, &path.child(i), depth)?;
                alternatives.push(Alternative::new(*index, *label, body));
            }
        }
        trace!("choice at {}: {} alternative(s)", path, alternatives.len());
        Ok(PlanNode::choice(title, alternatives))
    }
}

/// Compiles `input` with default options.
pub fn compile(input: Input) -> CompileResult<Plan> {
    PlanCompiler::new().compile(input)
}
