// src/system/config.rs

use crate::{
    constants::{CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILENAME, DEFAULT_INTERPRETER},
    models::Platform,
};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failures while loading `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists (or was named explicitly) but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Io {
        /// The config file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlParse {
        /// The config file path.
        path: String,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
}

/// User-level settings read from `config.toml`.
///
/// ```toml
/// interpreter = 'C:\Windows\System32\cmd.exe'
/// platform = "windows"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Interpreter used for wrapped invocations.
    pub interpreter: String,
    /// Forces the target platform instead of probing the host.
    pub platform: Option<Platform>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            platform: None,
        }
    }
}

impl Settings {
    /// The configured platform, or the host platform if none is set.
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

/// Returns the default config location (`<config_dir>/batspawn/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Loads settings from `$BATSPAWN_CONFIG` or the default location.
///
/// A missing file at the default location yields the defaults. A path given
/// explicitly through the environment must exist.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_with(env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
}

fn load_settings_with(explicit: Option<PathBuf>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        log::debug!("Loading settings from ${}: {}", CONFIG_ENV_VAR, path.display());
        return read_settings(&path);
    }

    match default_config_path() {
        Some(path) => load_settings_from(&path),
        None => {
            log::debug!("No system config directory; using default settings.");
            Ok(Settings::default())
        }
    }
}

/// Loads settings from `path`, falling back to the defaults if it does not exist.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        log::debug!(
            "Config file '{}' not found; using default settings.",
            path.display()
        );
        return Ok(Settings::default());
    }
    read_settings(path)
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.display().to_string(),
        source: e,
    })
}
