//! Compile service
//!
//! Compiles tree documents into plans, one file at a time or a whole
//! directory in parallel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use crate::application::loader::GuidebookLoader;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{CompileOptions, Plan, PlanCompiler, PlanStats};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::has_extension;

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Outcome of compiling one document of a directory.
#[derive(Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub result: ApplicationResult<Plan>,
}

impl DocumentReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service turning tree documents into plans.
pub struct CompileService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    loader: GuidebookLoader,
    compiler: PlanCompiler,
}

impl CompileService {
    /// Create a new compile service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        let loader = GuidebookLoader::new(Arc::clone(&fs));
        let compiler = PlanCompiler::with_options(CompileOptions {
            max_depth: settings.max_depth,
        });
        Self {
            fs,
            settings,
            loader,
            compiler,
        }
    }

    /// Compile a single tree document.
    #[instrument(level = "debug", skip(self))]
    pub fn compile_file(&self, path: &Path) -> ApplicationResult<Plan> {
        let input = self.loader.input_for(path)?;
        let plan = self.compiler.compile(input)?;
        debug!(
            "compile_file: {} -> {} task(s)",
            path.display(),
            plan.stats().tasks
        );
        Ok(plan)
    }

    /// Compile a document and summarize the resulting plan.
    pub fn check_file(&self, path: &Path) -> ApplicationResult<PlanStats> {
        self.compile_file(path).map(|plan| plan.stats())
    }

    /// Find tree documents below `dir`, sorted by path.
    ///
    /// Hidden files (including `.guideplan.toml`) and hidden directories
    /// are skipped.
    pub fn discover(&self, dir: &Path) -> ApplicationResult<Vec<PathBuf>> {
        if !self.fs.exists(dir) {
            return Err(ApplicationError::DocumentNotFound(dir.to_path_buf()));
        }
        if !self.fs.is_dir(dir) {
            return Err(ApplicationError::OperationFailed {
                context: format!("not a directory: {}", dir.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "expected a directory",
                )),
            });
        }

        let mut walker = WalkDir::new(dir);
        if let Some(depth) = self.settings.scan_depth {
            walker = walker.max_depth(depth);
        }

        let mut paths = Vec::new();
        // Depth 0 is `dir` itself, which may legitimately be hidden.
        let entries = walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in entries {
            let entry = entry.map_err(|e| ApplicationError::OperationFailed {
                context: format!("scan {}", dir.display()),
                source: Box::new(e),
            })?;
            if !entry.file_type().is_file()
                || !has_extension(entry.path(), &self.settings.extensions)
            {
                continue;
            }
            paths.push(entry.into_path());
        }
        paths.sort();
        debug!("discover: {} document(s) in {}", paths.len(), dir.display());
        Ok(paths)
    }

    /// Compile every document below `dir` in parallel.
    ///
    /// Each document compiles independently; one failure does not stop the
    /// others. Reports come back in path order.
    #[instrument(level = "debug", skip(self))]
    pub fn compile_dir(&self, dir: &Path) -> ApplicationResult<Vec<DocumentReport>> {
        let paths = self.discover(dir)?;
        let reports: Vec<DocumentReport> = paths
            .into_par_iter()
            .map(|path| {
                let result = self.compile_file(&path);
                if let Err(e) = &result {
                    warn!("compile failed: {}: {}", path.display(), e);
                }
                DocumentReport { path, result }
            })
            .collect();
        Ok(reports)
    }
}
