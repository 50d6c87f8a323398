//! Domain layer: tree model, classification, compiler and plan model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod classify;
pub mod compiler;
pub mod error;
pub mod plan;
pub mod render;
pub mod tree;

pub use classify::{classify, parse_option_title, NodeKind};
pub use compiler::{compile, CompileOptions, PlanCompiler, DEFAULT_MAX_DEPTH};
pub use error::{CompileError, CompileResult};
pub use plan::{Alternative, Plan, PlanNode, PlanStats};
pub use render::ToTermTree;
pub use tree::{Input, NodePath, TreeNode, TreeProducer, TreeSourceError};
