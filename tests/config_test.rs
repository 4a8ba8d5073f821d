//! Integration tests for Settings loading with a project config file.
//!
//! The global layer is passed explicitly, so a developer's own
//! `~/.config/mvn-offline/mvn-offline.toml` does not leak into these tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use mvn_offline::application::ApplicationError;
use mvn_offline::cli::args::ReportArgs;
use mvn_offline::cli::commands::apply_report_args;
use mvn_offline::config::{Settings, PROJECT_CONFIG_FILE};

#[test]
fn given_project_config_with_scalars_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    let project_config = r#"
mvn_command = "/opt/maven/bin/mvn"
local_repository = "/srv/offline-repo"
strict_indentation = true
"#;
    fs::write(project.path().join(PROJECT_CONFIG_FILE), project_config).unwrap();

    // Act
    let settings = Settings::load_layers(None, Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.mvn_command, "/opt/maven/bin/mvn");
    assert_eq!(
        settings.local_repository,
        Some(PathBuf::from("/srv/offline-repo"))
    );
    assert!(settings.strict_indentation);
}

#[test]
fn given_project_config_with_partial_report_when_load_then_inherits_other_fields() {
    // Arrange
    let project = TempDir::new().unwrap();
    let project_config = r#"
[report]
start_marker = "[INFO] com.example:app:jar"
"#;
    fs::write(project.path().join(PROJECT_CONFIG_FILE), project_config).unwrap();

    // Act
    let settings = Settings::load_layers(None, Some(project.path())).expect("load settings");

    // Assert
    let defaults = Settings::default();
    assert_eq!(settings.report.start_marker, "[INFO] com.example:app:jar");
    assert_eq!(settings.report.separator, defaults.report.separator);
    assert_eq!(settings.report.file_name, "dep_tree.txt");
}

#[test]
fn given_global_and_project_config_when_load_then_project_wins_per_field() {
    // Arrange
    let global = TempDir::new().unwrap();
    let global_path = global.path().join("mvn-offline.toml");
    let global_config = r#"
mvn_command = "/usr/share/maven/bin/mvn"
local_repository = "/srv/global-repo"
"#;
    fs::write(&global_path, global_config).unwrap();

    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "local_repository = \"/srv/project-repo\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_layers(Some(global_path.as_path()), Some(project.path()))
        .expect("load settings");

    // Assert
    assert_eq!(settings.mvn_command, "/usr/share/maven/bin/mvn");
    assert_eq!(
        settings.local_repository,
        Some(PathBuf::from("/srv/project-repo"))
    );
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(PROJECT_CONFIG_FILE), "mvn_command = [").unwrap();

    // Act
    let result = Settings::load_layers(None, Some(project.path()));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_no_project_config_when_load_then_uses_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load_layers(None, Some(project.path())).expect("load settings");

    assert_eq!(settings.dependency_dir, PathBuf::from("target/dependency"));
    assert_eq!(settings.report.line_prefix, "[INFO] ");
}

// ============================================================
// CLI flag layer
// ============================================================

#[test]
fn given_relative_dir_flag_when_resolve_then_joined_to_project_dir() {
    // Arrange
    let project = TempDir::new().unwrap();
    let args = ReportArgs {
        dir: Some(PathBuf::from("libs")),
        root: Some("[INFO] com.example:app:jar".into()),
        strict: true,
        ..Default::default()
    };

    // Act
    let settings = apply_report_args(Settings::default(), project.path(), &args);

    // Assert
    assert_eq!(settings.dependency_dir, project.path().join("libs"));
    assert_eq!(settings.report.start_marker, "[INFO] com.example:app:jar");
    assert!(settings.strict_indentation);
    assert_eq!(
        settings.report_path(),
        project.path().join("libs").join("dep_tree.txt")
    );
}

#[test]
fn given_no_flags_when_resolve_then_default_dir_under_project() {
    let project = TempDir::new().unwrap();

    let settings = apply_report_args(Settings::default(), project.path(), &ReportArgs::default());

    assert_eq!(
        settings.dependency_dir,
        project.path().join("target/dependency")
    );
    assert!(!settings.strict_indentation);
}
