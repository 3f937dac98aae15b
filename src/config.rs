//! Session settings and where they are loaded from.
//!
//! Lookup order for the settings file:
//! 1. `--config` CLI argument
//! 2. `ZOOMIST_CONFIG` environment variable
//! 3. Platform config directory from dirs-next, if the file exists there
//! 4. Built-in defaults
//!
//! `ZOOMIST_DEBOUNCE_MS` overrides the coalescing window of whatever was loaded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::debounce::DEFAULT_WINDOW;
use crate::widget::CONTAINER_DATA_EXPRESSION;

pub const CONFIG_FILE: &str = "zoomist.json";
pub const CONFIG_ENV: &str = "ZOOMIST_CONFIG";
pub const DEBOUNCE_ENV: &str = "ZOOMIST_DEBOUNCE_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a wheel/drag/resize burst is delivered
    pub debounce_ms: u64,
    /// Expression evaluated on the client for `fetch_container_data`
    pub container_data_expression: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_WINDOW.as_millis() as u64,
            container_data_expression: CONTAINER_DATA_EXPRESSION.to_string(),
        }
    }
}

impl Config {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Read a settings file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Config loaded from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Resolve and load settings following the lookup order above.
    ///
    /// An explicitly named file (CLI or env) must exist; the platform default
    /// is optional.
    pub fn resolve(cli_path: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(cli_path, |key| std::env::var(key).ok())
    }

    fn resolve_with(cli_path: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let explicit = cli_path.or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load(&path)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(path) => Self::load(&path)?,
                None => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        if let Some(raw) = env(DEBOUNCE_ENV) {
            config.debounce_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{DEBOUNCE_ENV} must be a whole number of milliseconds, got {raw:?}"))?;
            log::debug!("Debounce window overridden by {}: {}ms", DEBOUNCE_ENV, config.debounce_ms);
        }

        Ok(config)
    }
}

/// Platform location of the settings file
///
/// - Linux: ~/.config/zoomist/zoomist.json
/// - macOS: ~/Library/Application Support/zoomist/zoomist.json
/// - Windows: %APPDATA%\zoomist\zoomist.json
pub fn default_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("zoomist").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("zoomist-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.debounce_window(), Duration::from_millis(250));
        assert_eq!(config.container_data_expression, "return this.containerData");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_file(r#"{"debounce_ms": 100}"#);
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.container_data_expression, CONTAINER_DATA_EXPRESSION);
    }

    #[test]
    fn test_cli_beats_env() {
        let cli = temp_file(r#"{"debounce_ms": 10}"#);
        let other = temp_file(r#"{"debounce_ms": 20}"#);
        let env = env_of(&[(CONFIG_ENV, other.to_str().unwrap())]);

        let config = Config::resolve_with(Some(cli.clone()), &env).unwrap();
        assert_eq!(config.debounce_ms, 10);

        let config = Config::resolve_with(None, &env).unwrap();
        assert_eq!(config.debounce_ms, 20);

        std::fs::remove_file(&cli).ok();
        std::fs::remove_file(&other).ok();
    }

    #[test]
    fn test_env_window_override() {
        let path = temp_file(r#"{"debounce_ms": 10}"#);
        let env = env_of(&[(DEBOUNCE_ENV, " 75 ")]);
        let config = Config::resolve_with(Some(path.clone()), &env).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.debounce_ms, 75);

        let env = env_of(&[(DEBOUNCE_ENV, "soon")]);
        assert!(Config::resolve_with(None, &env).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let missing = std::env::temp_dir().join("zoomist-does-not-exist.json");
        let err = Config::resolve_with(Some(missing), env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_bad_json() {
        let path = temp_file("{debounce_ms: }");
        let err = Config::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
