//! Settings for the proxyswitch CLI.
//!
//! Layered with figment: built-in defaults, then the optional TOML file in
//! the platform config directory, then `PROXYSWITCH_*` environment
//! variables. The file is only ever read.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use proxyswitch_core::{DEFAULT_SESSION_NAME, SwitcherConfig};

pub const ENV_PREFIX: &str = "PROXYSWITCH_";

const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
const COLOR_MODES: &[&str] = &["auto", "always", "never"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Name passed to preferences and dynamic-store sessions.
    pub session_name: String,

    /// Allow the OS credentials prompt when writing.
    pub interactive_auth: bool,

    /// `tracing` filter used when neither `RUST_LOG` nor `-v` is given.
    pub log_level: Option<String>,

    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_name: DEFAULT_SESSION_NAME.into(),
            interactive_auth: true,
            log_level: None,
            log_file: None,
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "session_name".into(),
                reason: "must not be empty".into(),
            });
        }
        check_choice("defaults.output", &self.defaults.output, OUTPUT_FORMATS)?;
        check_choice("defaults.color", &self.defaults.color, COLOR_MODES)?;
        Ok(())
    }

    pub fn to_switcher_config(&self) -> SwitcherConfig {
        SwitcherConfig {
            session_name: self.session_name.clone(),
            interactive_auth: self.interactive_auth,
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn check_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Validation {
        field: field.into(),
        reason: format!("expected one of {}, got '{value}'", allowed.join(", ")),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "proxyswitch", "proxyswitch").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("proxyswitch");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load settings from the canonical path + environment.
pub fn load() -> Result<Settings, ConfigError> {
    load_from(&config_path())
}

/// Load settings from `path` + environment. A missing file is not an error.
///
/// Nested keys use a double underscore: `PROXYSWITCH_DEFAULTS__OUTPUT`.
pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let settings =
                load_from(&jail.directory().join("missing.toml")).map_err(|e| e.to_string())?;
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.to_switcher_config(), SwitcherConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|_jail| {
            let mut file = tempfile::NamedTempFile::new().map_err(|e| e.to_string())?;
            writeln!(
                file,
                "session_name = \"Office\"\ninteractive_auth = false\nlog_level = \"debug\"\n\n[defaults]\noutput = \"json\""
            )
            .map_err(|e| e.to_string())?;

            let settings = load_from(file.path()).map_err(|e| e.to_string())?;
            assert_eq!(settings.session_name, "Office");
            assert!(!settings.interactive_auth);
            assert_eq!(settings.log_level.as_deref(), Some("debug"));
            assert_eq!(settings.defaults.output, "json");
            assert_eq!(settings.defaults.color, "auto");
            assert_eq!(settings.to_switcher_config().session_name, "Office");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "session_name = \"FromFile\"")?;
            jail.set_env("PROXYSWITCH_SESSION_NAME", "FromEnv");
            jail.set_env("PROXYSWITCH_DEFAULTS__COLOR", "never");

            let settings =
                load_from(&jail.directory().join("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(settings.session_name, "FromEnv");
            assert_eq!(settings.defaults.color, "never");
            Ok(())
        });
    }

    #[test]
    fn invalid_output_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\noutput = \"xml\"")?;
            let err = load_from(&jail.directory().join("config.toml"))
                .err()
                .ok_or_else(|| "invalid output accepted".to_string())?;
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "defaults.output")
            );
            Ok(())
        });
    }

    #[test]
    fn empty_session_name_from_env_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("PROXYSWITCH_SESSION_NAME", " ");
            let result = load_from(&jail.directory().join("missing.toml"));
            assert!(matches!(result, Err(ConfigError::Validation { .. })));
            Ok(())
        });
    }

    #[test]
    fn settings_render_as_toml() {
        let rendered = Settings::default().to_toml().expect("toml");
        assert!(rendered.contains("session_name = \"ProxySwitch\""));
        assert!(rendered.contains("[defaults]"));
    }
}
