//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mvn-offline/mvn-offline.toml`
//! 3. Project config: `<project_dir>/.mvn-offline.toml`
//! 4. Environment variables: `MVN_OFFLINE_*` prefix
//! 5. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Name of the project-local config file.
pub const PROJECT_CONFIG_FILE: &str = ".mvn-offline.toml";

const ENV_PREFIX: &str = "MVN_OFFLINE";

/// Where the dependency tree sits inside a `mvn dependency:tree` log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Report file name inside the dependency directory
    pub file_name: String,
    /// Log level prefix in front of every line
    pub line_prefix: String,
    /// Line prefix that opens the tree (the root project coordinate)
    pub start_marker: String,
    /// Line prefix that closes the tree
    pub separator: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_name: "dep_tree.txt".into(),
            line_prefix: "[INFO] ".into(),
            start_marker: "[INFO] io.xc5:xvsa-maven-plugin:maven-plugin".into(),
            separator: format!("[INFO] {}", "-".repeat(72)),
        }
    }
}

/// Raw report config for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawReportConfig {
    pub file_name: Option<String>,
    pub line_prefix: Option<String>,
    pub start_marker: Option<String>,
    pub separator: Option<String>,
}

impl ReportConfig {
    /// Overlay wins for every field it specifies.
    pub fn merge(&self, overlay: &RawReportConfig) -> Self {
        Self {
            file_name: overlay
                .file_name
                .clone()
                .unwrap_or_else(|| self.file_name.clone()),
            line_prefix: overlay
                .line_prefix
                .clone()
                .unwrap_or_else(|| self.line_prefix.clone()),
            start_marker: overlay
                .start_marker
                .clone()
                .unwrap_or_else(|| self.start_marker.clone()),
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub mvn_command: Option<String>,
    pub dependency_dir: Option<PathBuf>,
    pub local_repository: Option<PathBuf>,
    pub strict_indentation: Option<bool>,
    #[serde(default)]
    pub report: RawReportConfig,
}

/// Unified configuration for mvn-offline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Maven executable (default: mvn)
    pub mvn_command: String,
    /// Directory with copied libraries and poms (default: target/dependency)
    pub dependency_dir: PathBuf,
    /// Repository to install into (default: Maven's own local repository)
    pub local_repository: Option<PathBuf>,
    /// Fail on tree lines without a branch marker instead of guessing a level
    pub strict_indentation: bool,
    /// Report layout
    pub report: ReportConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mvn_command: "mvn".into(),
            dependency_dir: PathBuf::from("target/dependency"),
            local_repository: None,
            strict_indentation: false,
            report: ReportConfig::default(),
        }
    }
}

/// Get the XDG config directory for mvn-offline.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mvn-offline").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mvn-offline.toml"))
}

/// Get the path to the project config file.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_CONFIG_FILE)
}

/// Expand `~`, `$VAR` and `${VAR}` in a path, leaving it untouched on failure.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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
    /// Merge overlay config onto self (base); specified fields replace.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            mvn_command: overlay
                .mvn_command
                .clone()
                .unwrap_or_else(|| self.mvn_command.clone()),
            dependency_dir: overlay
                .dependency_dir
                .clone()
                .unwrap_or_else(|| self.dependency_dir.clone()),
            local_repository: overlay
                .local_repository
                .clone()
                .or_else(|| self.local_repository.clone()),
            strict_indentation: overlay
                .strict_indentation
                .unwrap_or(self.strict_indentation),
            report: self.report.merge(&overlay.report),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.dependency_dir = expand_path(&self.dependency_dir);
        self.local_repository = self.local_repository.as_deref().map(expand_path);
    }

    /// Load settings with full precedence.
    ///
    /// `project_dir` is searched for `.mvn-offline.toml`; pass None to skip the
    /// project layer.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), project_dir)
    }

    /// Load settings with an explicit global config file instead of the XDG one.
    ///
    /// Missing files are skipped, so `None` or a nonexistent path leaves the
    /// global layer out.
    pub fn load_layers(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project config
        if let Some(dir) = project_dir {
            let local_path = project_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply MVN_OFFLINE_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `MVN_OFFLINE_REPORT__START_MARKER`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("mvn_command") {
            settings.mvn_command = val;
        }
        if let Ok(val) = config.get_string("dependency_dir") {
            settings.dependency_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("local_repository") {
            settings.local_repository = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("strict_indentation") {
            settings.strict_indentation = val;
        }
        if let Ok(val) = config.get_string("report.file_name") {
            settings.report.file_name = val;
        }
        if let Ok(val) = config.get_string("report.line_prefix") {
            settings.report.line_prefix = val;
        }
        if let Ok(val) = config.get_string("report.start_marker") {
            settings.report.start_marker = val;
        }
        if let Ok(val) = config.get_string("report.separator") {
            settings.report.separator = val;
        }

        Ok(settings)
    }

    /// Default report location: `<dependency_dir>/<report.file_name>`.
    pub fn report_path(&self) -> PathBuf {
        self.dependency_dir.join(&self.report.file_name)
    }

    /// Serialize the effective settings.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented config file template.
    pub fn template() -> String {
        let report = ReportConfig::default();
        format!(
            r#"# mvn-offline configuration
# Global: ~/.config/mvn-offline/mvn-offline.toml
# Project: ./{project_file}

# Maven executable
# mvn_command = "mvn"

# Directory filled by:
#   mvn dependency:copy-dependencies -Dmdep.addParentPoms=true -Dmdep.copyPom=true
# dependency_dir = "target/dependency"

# Install into this repository instead of ~/.m2/repository
# local_repository = "~/offline-repo"

# Fail on tree lines without a branch marker
# strict_indentation = false

[report]
# Output of: mvn -B dependency:tree > target/dependency/{file_name}
# file_name = "{file_name}"
# line_prefix = "{line_prefix}"
# start_marker = "{start_marker}"
# separator = "{separator}"
"#,
            project_file = PROJECT_CONFIG_FILE,
            file_name = report.file_name,
            line_prefix = report.line_prefix,
            start_marker = report.start_marker,
            separator = report.separator,
        )
    }
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
    fn given_defaults_then_match_maven_dependency_plugin_layout() {
        let settings = Settings::default();
        assert_eq!(settings.mvn_command, "mvn");
        assert_eq!(settings.dependency_dir, PathBuf::from("target/dependency"));
        assert_eq!(
            settings.report_path(),
            PathBuf::from("target/dependency/dep_tree.txt")
        );
        assert!(settings.local_repository.is_none());
        assert!(!settings.strict_indentation);
    }

    #[test]
    fn given_default_report_config_then_separator_is_72_dashes() {
        let report = ReportConfig::default();
        assert_eq!(
            report.separator,
            "[INFO] ------------------------------------------------------------------------"
        );
        assert_eq!(report.line_prefix, "[INFO] ");
    }

    #[test]
    fn given_overlay_when_merge_then_specified_fields_replace() {
        let base = Settings::default();
        let overlay = RawSettings {
            mvn_command: Some("/opt/maven/bin/mvn".into()),
            local_repository: Some(PathBuf::from("/srv/repo")),
            report: RawReportConfig {
                start_marker: Some("[INFO] com.example:app:jar".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.mvn_command, "/opt/maven/bin/mvn");
        assert_eq!(merged.local_repository, Some(PathBuf::from("/srv/repo")));
        assert_eq!(merged.report.start_marker, "[INFO] com.example:app:jar");
        assert_eq!(merged.report.separator, base.report.separator);
        assert_eq!(merged.dependency_dir, base.dependency_dir);
    }

    #[test]
    fn given_tilde_in_repository_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            local_repository: Some(PathBuf::from("~/offline-repo")),
            ..Default::default()
        };
        settings.expand_paths();

        let repo = settings.local_repository.unwrap();
        assert!(!repo.to_string_lossy().starts_with('~'));
        assert!(repo.to_string_lossy().ends_with("offline-repo"));
    }

    #[test]
    fn given_settings_when_to_toml_then_roundtrips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_then_parses_as_toml() {
        let parsed: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(parsed.mvn_command.is_none());
    }
}
