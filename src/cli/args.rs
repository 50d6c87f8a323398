//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Guidebook plan compiler: turns nested guidebook sections into sequence/choice/task plans
#[derive(Parser, Debug)]
#[command(name = "guideplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a tree document and print the plan
    Compile {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output format (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the input tree with node classification
    Tree {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Compile documents and report problems
    Check {
        /// Document or directory (default: guidebook_dir from config)
        #[arg(value_hint = ValueHint::AnyPath)]
        path: Option<PathBuf>,
    },

    /// List the plan's commands in document order
    Commands {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show {
        /// Directory whose local config is merged in
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
