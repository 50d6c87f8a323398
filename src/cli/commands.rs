//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::{classify, NodeKind, PlanStats, ToTermTree, TreeNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Compile { file, format }) => cmd_compile(cli, file, *format),
        Some(Commands::Tree { file }) => cmd_tree(cli, file),
        Some(Commands::Check { path }) => cmd_check(cli, path.as_deref()),
        Some(Commands::Commands { file }) => cmd_commands(cli, file),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into()),
    }
}

/// Load settings for a document location and apply the color choice.
fn container_for(cli: &Cli, location: &Path) -> CliResult<ServiceContainer> {
    let local_dir = if location.is_dir() {
        Some(location)
    } else {
        location.parent().filter(|p| !p.as_os_str().is_empty())
    };
    let settings = Settings::load(local_dir.or(Some(Path::new("."))))?;
    apply_color(cli, &settings);
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

fn apply_color(cli: &Cli, settings: &Settings) {
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }
}

fn stats_line(stats: &PlanStats) -> String {
    format!(
        "{} task(s), {} sequence(s), {} choice(s) with {} alternative(s), depth {}",
        stats.tasks, stats.sequences, stats.choices, stats.alternatives, stats.depth
    )
}

#[instrument(skip(cli))]
fn cmd_compile(cli: &Cli, file: &Path, format: Option<OutputFormat>) -> CliResult<()> {
    let container = container_for(cli, file)?;
    let plan = container.compile_service.compile_file(file)?;

    match format.unwrap_or(container.settings.format) {
        OutputFormat::Tree => output::raw(&plan),
        OutputFormat::Json => {
            let json = plan.to_json().map_err(|source| InfraError::Serialize {
                context: format!("plan for {}", file.display()),
                source,
            })?;
            output::info(&json);
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = container_for(cli, file)?;
    let doc = container.loader().load(file)?;

    output::header(&format!("{} ({} root(s))", file.display(), doc.tree.len()));
    for root in &doc.tree {
        output::raw(&root.to_term_tree());
    }

    let (mut leaves, mut options, mut sections) = (0usize, 0usize, 0usize);
    let mut stack: Vec<&TreeNode> = doc.tree.iter().collect();
    while let Some(node) = stack.pop() {
        match classify(node) {
            NodeKind::Leaf => leaves += 1,
            NodeKind::Option { .. } => options += 1,
            NodeKind::Section => sections += 1,
        }
        stack.extend(node.children.iter());
    }
    let depth = doc.tree.iter().map(TreeNode::depth).max().unwrap_or(0);
    output::detail(&format!(
        "{} section(s), {} option(s), {} command(s), depth {}",
        sections, options, leaves, depth
    ));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_check(cli: &Cli, path: Option<&Path>) -> CliResult<()> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let settings = Settings::load(None)?;
            settings.guidebook_dir.ok_or_else(|| {
                CliError::Usage("no path given and no guidebook_dir configured".to_string())
            })?
        }
    };
    let container = container_for(cli, &path)?;

    if !path.is_dir() {
        let stats = container.compile_service.check_file(&path)?;
        output::success(&format!("{}: {}", path.display(), stats_line(&stats)));
        return Ok(());
    }

    let reports = container.compile_service.compile_dir(&path)?;
    if reports.is_empty() {
        output::warning(&format!("no tree documents found in {}", path.display()));
        return Ok(());
    }

    let mut failed = 0;
    for report in &reports {
        match &report.result {
            Ok(plan) => output::success(&format!(
                "{}: {}",
                report.path.display(),
                stats_line(&plan.stats())
            )),
            Err(e) => {
                failed += 1;
                output::failure(&format!("{}: {}", report.path.display(), e));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_commands(cli: &Cli, file: &Path) -> CliResult<()> {
    let container = container_for(cli, file)?;
    let plan = container.compile_service.compile_file(file)?;
    for command in plan.commands() {
        output::info(command);
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            apply_color(cli, &settings);
            output::raw(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(Path::new("."))
            };
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            let container = ServiceContainer::new(Settings::default());
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            let describe = |p: &Path| {
                let state = if p.exists() { "exists" } else { "missing" };
                format!("{} ({})", p.display(), state)
            };
            match global_config_path() {
                Some(p) => output::info(&format!("global: {}", describe(p.as_path()))),
                None => output::info("global: unavailable"),
            }
            output::info(&format!(
                "local:  {}",
                describe(local_config_path(Path::new(".")).as_path())
            ));
            Ok(())
        }
    }
}
