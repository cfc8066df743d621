//! Optional TOML configuration file for the binary.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use raven_hunt_core::{Tuning, TuningError};
use serde::Deserialize;
use thiserror::Error;

/// Settings read from a configuration file; every table and field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) tuning: Tuning,
    pub(crate) window: WindowConfig,
    pub(crate) assets: AssetConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Raven Hunt"),
            width: 1280,
            height: 720,
            vsync: true,
            show_fps: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AssetConfig {
    pub(crate) manifest: PathBuf,
    pub(crate) sprites: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("assets/manifest.toml"),
            sprites: true,
        }
    }
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Rejects settings that cannot produce a playable session.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    #[error("invalid tuning")]
    Tuning(#[from] TuningError),
    #[error("window must be at least 1x1 pixels (received {width}x{height})")]
    EmptyWindow { width: u32, height: u32 },
}
