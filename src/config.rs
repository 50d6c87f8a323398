//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/guideplan/guideplan.toml`
//! 3. Local config: `<dir>/.guideplan.toml` (directory holding the tree documents)
//! 4. Environment variables: `GUIDEPLAN_*` prefix

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_MAX_DEPTH;
use crate::util::path::expand_env_vars;

/// How compiled plans are printed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nested tree rendering
    #[default]
    Tree,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Some(Self::Tree),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub format: Option<OutputFormat>,
    pub color: Option<bool>,
    pub max_depth: Option<usize>,
    pub scan_depth: Option<usize>,
    pub extensions: Option<Vec<String>>,
    pub guidebook_dir: Option<PathBuf>,
}

/// Unified configuration for guideplan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Plan output format (default: tree)
    pub format: OutputFormat,
    /// Colored terminal output (default: true)
    pub color: bool,
    /// Deepest allowed section nesting
    pub max_depth: usize,
    /// Directory recursion limit when checking a directory (default: unbounded)
    pub scan_depth: Option<usize>,
    /// Document extensions picked up by directory checks
    pub extensions: Vec<String>,
    /// Directory checked when `check` gets no path
    pub guidebook_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tree,
            color: true,
            max_depth: DEFAULT_MAX_DEPTH,
            scan_depth: None,
            extensions: vec!["json".into(), "toml".into()],
            guidebook_dir: None,
        }
    }
}

/// Get the XDG config directory for guideplan.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "guideplan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("guideplan.toml"))
}

/// Get the path to the local config file in a document directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".guideplan.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.guidebook_dir {
            self.guidebook_dir = Some(PathBuf::from(expand_env_vars(
                dir.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `extensions`: union merge with negation support
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            format: overlay.format.unwrap_or(self.format),
            color: overlay.color.unwrap_or(self.color),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            scan_depth: overlay.scan_depth.or(self.scan_depth),
            extensions: overlay
                .extensions
                .as_ref()
                .map(|o| Self::merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
            guidebook_dir: overlay
                .guidebook_dir
                .clone()
                .or_else(|| self.guidebook_dir.clone()),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// `extensions` entirely if the global config specifies it.
    pub fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
            ..self.merge_with(&RawSettings {
                extensions: None,
                ..global.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional document directory holding a `.guideplan.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply GUIDEPLAN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("GUIDEPLAN")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("format") {
            settings.format = OutputFormat::parse(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("GUIDEPLAN_FORMAT: unknown format '{}'", val),
            })?;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = env_depth("GUIDEPLAN_MAX_DEPTH", val)?;
        }
        if let Ok(val) = config.get_int("scan_depth") {
            settings.scan_depth = Some(env_depth("GUIDEPLAN_SCAN_DEPTH", val)?);
        }
        if let Ok(val) = config.get::<Vec<String>>("extensions") {
            settings.extensions = val;
        }
        if let Ok(val) = config.get_string("guidebook_dir") {
            settings.guidebook_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# guideplan configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/guideplan/guideplan.toml  (defines your baseline)
#   Local:  <dir>/.guideplan.toml               (next to the tree documents)
#   Env:    GUIDEPLAN_* environment variables   (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global; "!item" removes an inherited item:
#     extensions = ["yml", "!toml"]

# Plan output format: "tree" or "json"
# format = "tree"

# Colored terminal output
# color = true

# Deepest allowed section nesting
# max_depth = 64

# Directory recursion limit for `check <dir>` (unbounded when unset)
# scan_depth = 3

# Document extensions picked up by `check <dir>`
# extensions = ["json", "toml"]

# Directory checked when `check` is called without a path
# guidebook_dir = "~/guidebooks"
"#
        .to_string()
    }
}

/// Depth limits from the environment must be non-negative.
fn env_depth(var: &str, val: i64) -> Result<usize, ApplicationError> {
    usize::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{}: invalid value {}", var, val),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_negative_depth_from_env_when_converted_then_config_error() {
        let err = env_depth("GUIDEPLAN_SCAN_DEPTH", -1).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Config { ref message } if message.contains("GUIDEPLAN_SCAN_DEPTH")
        ));
        assert_eq!(env_depth("GUIDEPLAN_SCAN_DEPTH", 3).unwrap(), 3);
    }

    #[test]
    fn given_defaults_when_created_then_scans_json_and_toml() {
        let settings = Settings::default();
        assert_eq!(settings.format, OutputFormat::Tree);
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert!(settings.extensions.contains(&"json".to_string()));
        assert!(settings.extensions.contains(&"toml".to_string()));
    }

    #[test]
    fn given_tilde_in_guidebook_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            guidebook_dir: Some(PathBuf::from("~/guidebooks")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.guidebook_dir.unwrap();
        assert!(
            dir.to_string_lossy().starts_with(&home),
            "guidebook_dir should start with home dir: {}",
            dir.display()
        );
    }

    #[test]
    fn test_merge_array_negation() {
        let base = vec!["json".to_string(), "toml".to_string()];
        let overlay = vec!["!toml".to_string(), "yml".to_string()];
        let result = Settings::merge_array(&base, &overlay);

        assert_eq!(result, vec!["json".to_string(), "yml".to_string()]);
    }

    #[test]
    fn test_merge_with_keeps_base_when_not_specified() {
        let base = Settings::default();
        let overlay = RawSettings {
            max_depth: Some(8),
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.max_depth, 8);
        assert_eq!(result.format, base.format);
        assert_eq!(result.extensions, base.extensions);
    }

    #[test]
    fn test_apply_global_replaces_extensions() {
        let base = Settings::default();
        let global = RawSettings {
            format: Some(OutputFormat::Json),
            extensions: Some(vec!["yaml".to_string()]),
            ..RawSettings::default()
        };

        let result = base.apply_global(&global);

        assert_eq!(result.format, OutputFormat::Json);
        assert_eq!(result.extensions, vec!["yaml".to_string()]);
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips_format() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("format = \"tree\""));
    }
}
