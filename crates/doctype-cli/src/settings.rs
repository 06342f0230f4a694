//! User settings, persisted as TOML.
//!
//! Looked up at `--config` when given, otherwise in the platform config
//! directory:
//! - macOS: ~/Library/Application Support/org.doctype-layout.doctype-layout/
//! - Windows: %APPDATA%/doctype-layout/config/
//! - Linux: ~/.config/doctype-layout/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use doctype_model::UserRoles;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "doctype-layout";
const APP_NAME: &str = "doctype-layout";
const CONFIG_FILENAME: &str = "settings.toml";
const STATE_FILENAME: &str = "collapse-state.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub evaluation: EvaluationSettings,
    pub output: OutputSettings,
    pub state: StateSettings,
}

/// Defaults for expression evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Roles used when no `--role` is passed.
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Outline,
    Json,
    Table,
}

/// Where collapse state is kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Overrides the platform data directory location.
    pub collapse_file: Option<PathBuf>,
    /// Save collapse state after `layout` runs.
    pub persist: bool,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            collapse_file: None,
            persist: true,
        }
    }
}

impl Settings {
    /// Roles from `cli_roles`, or the configured defaults when none are given.
    pub fn roles(&self, cli_roles: &[String]) -> UserRoles {
        if cli_roles.is_empty() {
            UserRoles::new(self.evaluation.roles.iter().cloned())
        } else {
            UserRoles::new(cli_roles.iter().cloned())
        }
    }

    /// Resolved collapse-state file, if any location can be determined.
    pub fn collapse_state_path(&self) -> Option<PathBuf> {
        self.state.collapse_file.clone().or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
                .map(|dirs| dirs.data_dir().join(STATE_FILENAME))
        })
    }
}

/// Platform settings file location.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `explicit`, or from the platform location.
///
/// Missing or unreadable files fall back to defaults.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Some(path) => path,
            None => {
                warn!("could not determine settings path, using defaults");
                return Settings::default();
            }
        },
    };
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to parse settings, using defaults");
                Settings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            if explicit.is_some() {
                warn!(path = %path.display(), "settings file not found, using defaults");
            }
            Settings::default()
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to read settings, using defaults");
            Settings::default()
        }
    }
}

/// Write `settings` to `path`, creating parent directories.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "saved settings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [evaluation]
            roles = ["Sales User"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.evaluation.roles, vec!["Sales User".to_string()]);
        assert_eq!(settings.output, OutputSettings::default());
        assert!(settings.state.persist);
    }

    #[test]
    fn cli_roles_override_configured_roles() {
        let mut settings = Settings::default();
        settings.evaluation.roles = vec!["Guest".to_string()];
        assert!(settings.roles(&[]).contains("Guest"));
        let roles = settings.roles(&["System Manager".to_string()]);
        assert!(roles.contains("System Manager"));
        assert!(!roles.contains("Guest"));
    }

    #[test]
    fn explicit_state_file_wins() {
        let mut settings = Settings::default();
        settings.state.collapse_file = Some(PathBuf::from("/tmp/state.json"));
        assert_eq!(
            settings.collapse_state_path(),
            Some(PathBuf::from("/tmp/state.json"))
        );
    }

    #[test]
    fn default_settings_round_trip() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
