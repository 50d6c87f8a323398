//! Path helpers shared by config and services

use std::path::Path;

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
///
/// Unresolvable variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Check whether `path` has one of `extensions` (case-insensitive, no leading dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_matching_extension_when_checked_then_true() {
        let exts = vec!["json".to_string(), "toml".to_string()];
        assert!(has_extension(Path::new("a/guide.JSON"), &exts));
        assert!(!has_extension(Path::new("a/guide.md"), &exts));
        assert!(!has_extension(Path::new("a/README"), &exts));
    }

    #[test]
    fn given_unknown_variable_when_expanding_then_unchanged() {
        assert_eq!(
            expand_env_vars("$GUIDEPLAN_SURELY_UNSET_VAR/x"),
            "$GUIDEPLAN_SURELY_UNSET_VAR/x"
        );
    }
}
