//! Test support: one-time logging setup and shared guidebook fixtures

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::TreeNode;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "guideplan=trace");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// `Option <index>: <label>` section.
pub fn option_node(index: u32, label: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode::section(format!("Option {}: {}", index, label), children)
}

/// The cluster prerequisites guidebook:
///
/// ```text
/// Prerequisites
/// ├── EEE
/// │   └── Option 1: TabE1 ── echo EEE
/// └── DDD
///     ├── Option 1: SubTab1 ── echo AAA (x3)
///     └── Option 2: SubTab2 ── echo BBB
/// ```
pub fn prerequisites_forest() -> Vec<TreeNode> {
    vec![TreeNode::section(
        "Prerequisites",
        vec![
            TreeNode::section(
                "EEE",
                vec![option_node(1, "TabE1", vec![TreeNode::leaf("echo EEE")])],
            ),
            TreeNode::section(
                "DDD",
                vec![
                    option_node(
                        1,
                        "SubTab1",
                        vec![
                            TreeNode::leaf("echo AAA"),
                            TreeNode::leaf("echo AAA"),
                            TreeNode::leaf("echo AAA"),
                        ],
                    ),
                    option_node(2, "SubTab2", vec![TreeNode::leaf("echo BBB")]),
                ],
            ),
        ],
    )]
}
