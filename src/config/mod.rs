//! Daemon configuration, read from a TOML file

use crate::{device::DEFAULT_CLASS_ROOT, external::write_backend::BackendKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Every key is optional. Unknown keys are an error, so that typos
/// don't get silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Parent of the `backlight` and `leds` class directories
    pub class_root: PathBuf,
    /// Minimal spacing of two writes to one device
    pub update_delay_ms: u64,
    pub backend: BackendKind,
    /// Used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            class_root: PathBuf::from(DEFAULT_CLASS_ROOT),
            update_delay_ms: 50,
            backend: BackendKind::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Couldn't read configuration from {}", path.display()))?;
        Config::from_toml_str(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }
}
