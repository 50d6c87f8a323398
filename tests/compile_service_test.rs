//! Tests for CompileService

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use guideplan::application::ApplicationError;
use guideplan::config::Settings;
use guideplan::domain::CompileError;
use guideplan::infrastructure::di::ServiceContainer;
use guideplan::infrastructure::traits::RealFileSystem;
use guideplan::util::testing::init_test_setup;

fn resources() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources")
}

fn container(settings: Settings) -> ServiceContainer {
    init_test_setup();
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem))
}

fn relative(paths: &[PathBuf], base: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

// ============================================================
// Single documents
// ============================================================

#[test]
fn given_guidebook_when_check_file_then_stats_reported() {
    let container = container(Settings::default());

    let stats = container
        .compile_service
        .check_file(&resources().join("guidebooks/prerequisites.json"))
        .unwrap();

    assert_eq!(stats.tasks, 5);
    assert_eq!(stats.choices, 2);
    assert_eq!(stats.alternatives, 3);
    assert_eq!(stats.sequences, 4);
}

#[test]
fn given_small_max_depth_when_compile_file_then_malformed_tree() {
    let settings = Settings {
        max_depth: 2,
        ..Settings::default()
    };
    let container = container(settings);

    let err = container
        .compile_service
        .compile_file(&resources().join("guidebooks/prerequisites.json"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Compile(CompileError::MalformedTree { .. })
    ));
}

#[test]
fn given_duplicate_options_when_compile_file_then_compile_error() {
    let container = container(Settings::default());

    let err = container
        .compile_service
        .compile_file(&resources().join("broken/duplicate.toml"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Compile(CompileError::DuplicateOptionIndex { index: 1, .. })
    ));
}

// ============================================================
// Directories
// ============================================================

#[test]
fn given_guidebook_dir_when_discover_then_sorted_documents_without_config() {
    let base = resources().join("guidebooks");
    let container = container(Settings::default());

    let paths = container.compile_service.discover(&base).unwrap();

    assert_eq!(
        relative(&paths, &base),
        vec!["nested/cluster.toml", "prerequisites.json"]
    );
}

#[test]
fn given_scan_depth_one_when_discover_then_nested_documents_skipped() {
    let base = resources().join("guidebooks");
    let settings = Settings {
        scan_depth: Some(1),
        ..Settings::default()
    };
    let container = container(settings);

    let paths = container.compile_service.discover(&base).unwrap();

    assert_eq!(relative(&paths, &base), vec!["prerequisites.json"]);
}

#[test]
fn given_json_only_extensions_when_discover_then_toml_skipped() {
    let base = resources().join("guidebooks");
    let settings = Settings {
        extensions: vec!["json".to_string()],
        ..Settings::default()
    };
    let container = container(settings);

    let paths = container.compile_service.discover(&base).unwrap();

    assert_eq!(relative(&paths, &base), vec!["prerequisites.json"]);
}

#[test]
fn given_hidden_directory_when_discover_then_not_descended() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let doc = r#"[{"name": "echo a"}]"#;
    fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join(".git/config.json"), doc).unwrap();
    fs::write(dir.path().join(".git/objects/pack.json"), doc).unwrap();
    fs::write(dir.path().join("docs/setup.json"), doc).unwrap();
    fs::write(dir.path().join("main.json"), doc).unwrap();
    let container = container(Settings::default());

    // Act
    let paths = container.compile_service.discover(dir.path()).unwrap();

    // Assert
    assert_eq!(
        relative(&paths, dir.path()),
        vec!["docs/setup.json", "main.json"]
    );
}

#[test]
fn given_hidden_scan_root_when_discover_then_its_documents_found() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join(".guidebooks");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("setup.json"), r#"[{"name": "echo a"}]"#).unwrap();
    let container = container(Settings::default());

    let paths = container.compile_service.discover(&root).unwrap();

    assert_eq!(relative(&paths, &root), vec!["setup.json"]);
}

#[test]
fn given_valid_documents_when_compile_dir_then_all_succeed_in_order() {
    let base = resources().join("guidebooks");
    let container = container(Settings::default());

    let reports = container.compile_service.compile_dir(&base).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_ok()));
    assert!(reports[0].path.ends_with("nested/cluster.toml"));
    assert!(reports[1].path.ends_with("prerequisites.json"));
}

#[test]
fn given_broken_documents_when_compile_dir_then_each_failure_reported() {
    let base = resources().join("broken");
    let container = container(Settings::default());

    let reports = container.compile_service.compile_dir(&base).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| !r.is_ok()));
    assert!(matches!(
        reports[1].result,
        Err(ApplicationError::Compile(CompileError::MixedSiblingKind { .. }))
    ));
}

#[test]
fn given_one_bad_document_when_compile_dir_then_others_still_compile() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"[{"name": "echo a"}]"#).unwrap();
    fs::write(dir.path().join("b.json"), r#"[{"name": "S", "children": []}]"#).unwrap();
    fs::write(dir.path().join("c.json"), "not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    let container = container(Settings::default());

    // Act
    let reports = container.compile_service.compile_dir(dir.path()).unwrap();

    // Assert
    let outcomes: Vec<bool> = reports.iter().map(|r| r.is_ok()).collect();
    assert_eq!(outcomes, vec![true, true, false]);
}

#[test]
fn given_missing_dir_when_compile_dir_then_not_found() {
    let dir = TempDir::new().unwrap();
    let container = container(Settings::default());

    let err = container
        .compile_service
        .compile_dir(&dir.path().join("absent"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::DocumentNotFound(_)));
}

#[test]
fn given_file_path_when_discover_then_operation_failed() {
    let container = container(Settings::default());

    let err = container
        .compile_service
        .discover(&resources().join("guidebooks/prerequisites.json"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}
