//! Configuration management and validation.
//!
//! Provides the store configuration: where the four data files live and
//! which separators and null token the line codec uses. Configuration is
//! layered: defaults, then an optional TOML file, then the environment,
//! then explicit overrides from the command line.

use crate::app::models::RecordKind;
use crate::app::services::line_codec::Separators;
use crate::constants::{
    APP_DIR_NAME, CENTER_FILE_NAME, CITY_FILE_NAME, CONFIG_FILE_NAME, DATA_DIR_ENV_VAR,
    DEFAULT_DATA_DIR, DEFAULT_FIELD_SEPARATOR, DEFAULT_NULL_TOKEN, DEFAULT_SUB_SEPARATOR,
    OPERATOR_FILE_NAME, WEATHER_FILE_NAME,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names of the four collections, relative to the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub city: String,
    pub operator: String,
    pub center: String,
    pub weather: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            city: CITY_FILE_NAME.to_string(),
            operator: OPERATOR_FILE_NAME.to_string(),
            center: CENTER_FILE_NAME.to_string(),
            weather: WEATHER_FILE_NAME.to_string(),
        }
    }
}

/// Global configuration for the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory containing the data files
    pub data_dir: PathBuf,

    /// Per-collection file names
    pub files: DataFiles,

    /// Primary field separator
    pub field_separator: char,

    /// Secondary separator for list and sub-record fields
    pub sub_separator: char,

    /// Token written for null scalars
    pub null_token: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            files: DataFiles::default(),
            field_separator: DEFAULT_FIELD_SEPARATOR,
            sub_separator: DEFAULT_SUB_SEPARATOR,
            null_token: DEFAULT_NULL_TOKEN.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create configuration rooted at a custom data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Use custom field and sub-field separators
    pub fn with_separators(mut self, field: char, sub: char) -> Self {
        self.field_separator = field;
        self.sub_separator = sub;
        self
    }

    /// Use a custom null token
    pub fn with_null_token(mut self, token: impl Into<String>) -> Self {
        self.null_token = token.into();
        self
    }

    /// Path of the backing file for a collection
    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        let name = match kind {
            RecordKind::City => &self.files.city,
            RecordKind::Operator => &self.files.operator,
            RecordKind::Center => &self.files.center,
            RecordKind::Weather => &self.files.weather,
        };
        self.data_dir.join(name)
    }

    /// Separators handed to the line codec
    pub fn separators(&self) -> Separators {
        Separators {
            field: self.field_separator,
            sub: self.sub_separator,
            null_token: self.null_token.clone(),
        }
    }

    /// Check that the codec settings can produce unambiguous lines
    pub fn validate(&self) -> Result<()> {
        if self.field_separator == self.sub_separator {
            return Err(Error::configuration(format!(
                "Field and sub-field separators must differ (both '{}')",
                self.field_separator
            )));
        }

        for separator in [self.field_separator, self.sub_separator] {
            if separator.is_alphanumeric() || separator.is_whitespace() {
                return Err(Error::configuration(format!(
                    "Separator '{}' must be a visible non-alphanumeric character",
                    separator
                )));
            }
        }

        if self.null_token.is_empty() {
            return Err(Error::configuration("Null token cannot be empty"));
        }

        if self
            .null_token
            .contains([self.field_separator, self.sub_separator])
        {
            return Err(Error::configuration(format!(
                "Null token '{}' cannot contain a separator",
                self.null_token
            )));
        }

        Ok(())
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| Error::configuration(format!("Invalid configuration file: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&text)
    }

    /// Default location of the config file in the user's config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration using layered approach (file -> env -> overrides)
    pub fn load_layered(config_file: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Reading configuration from {}", path.display());
                Self::load_file(path)?
            }
            None => match Self::default_config_path() {
                Ok(path) if path.is_file() => {
                    debug!("Reading configuration from {}", path.display());
                    Self::load_file(&path)?
                }
                _ => Self::default(),
            },
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV_VAR) {
            if !dir.trim().is_empty() {
                debug!("Data directory overridden by {}: {}", DATA_DIR_ENV_VAR, dir);
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }

        config.validate()?;
        Ok(config)
    }
}
