//! Configuration management for fmswidget.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::{FsImageLoader, DEFAULT_MAX_IMAGE_BYTES};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fmswidget";

/// Default store file name.
const STORE_FILE_NAME: &str = "widget_data.db";

/// Default directory name for published map images.
const IMAGE_DIR_NAME: &str = "images";

/// Default refresh interval: the shortest periodic update Android honors.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30 * 60;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FMSWIDGET_`, sections split on `__`)
/// 2. TOML config file at `~/.config/fmswidget/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shared store configuration.
    pub store: StoreConfig,
    /// Map image configuration.
    pub image: ImageConfig,
    /// Refresh host configuration.
    pub refresh: RefreshConfig,
    /// Rendering configuration.
    pub render: RenderConfig,
}

/// Shared store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the store database.
    /// Defaults to `~/.local/share/fmswidget/widget_data.db`
    pub path: Option<PathBuf>,
}

/// Map image configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Largest image file the map renderer will load, in bytes.
    pub max_bytes: u64,
    /// Directory the publisher writes map images into.
    /// Defaults to `~/.local/share/fmswidget/images`
    pub dir: Option<PathBuf>,
}

/// Refresh host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between refresh ticks.
    pub interval_secs: u64,
}

/// Rendering configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Platform whose view description `render` produces by default.
    pub platform: Platform,
}

/// Target platform for view construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android `RemoteViews`.
    #[default]
    Android,
    /// iOS `WidgetKit`.
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => write!(f, "android"),
            Self::Ios => write!(f, "ios"),
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            other => Err(Error::ConfigValidation {
                message: format!("unknown platform: {other}"),
            }),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            dir: None, // Will be resolved to default at runtime
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FMSWIDGET_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "refresh.interval_secs must be greater than 0".to_string(),
            });
        }

        if self.image.max_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "image.max_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the store path, resolving defaults if not set.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(STORE_FILE_NAME))
    }

    /// Get the map image directory, resolving defaults if not set.
    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        self.image
            .dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(IMAGE_DIR_NAME))
    }

    /// Get the refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }

    /// Build the image loader configured by this config.
    #[must_use]
    pub fn image_loader(&self) -> FsImageLoader {
        FsImageLoader::with_max_bytes(self.image.max_bytes)
    }
}
