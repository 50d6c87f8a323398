//! guideplan: compile guidebook section trees into executable plans.
//!
//! A guidebook forest (sections, `Option N: label` alternatives, command
//! leaves) compiles into a [`Plan`](domain::Plan) of sequences, choices and
//! tasks that a wizard-style runner can walk.
//!
//! ```
//! use guideplan::domain::{compile, Input, PlanNode, TreeNode};
//!
//! let forest = vec![TreeNode::section("Setup", vec![TreeNode::leaf("make")])];
//! let plan = compile(Input::from_forest("setup.md", forest)).unwrap();
//! assert_eq!(plan.root, PlanNode::sequence("Setup", vec![PlanNode::task("make")]));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
