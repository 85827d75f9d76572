use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::format::CurrencyFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Starting values of the loan calculator fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorDefaults {
    pub interest_rate: f64,
    pub term_years: u32,
    pub down_payment_percent: f64,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            interest_rate: 6.5,
            term_years: 30,
            down_payment_percent: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: CurrencyFormat,
    pub page_size: usize,
    pub calculator: CalculatorDefaults,
    /// Where uploaded listing photos are stored.
    pub media_dir: PathBuf,
    /// Replaces the bundled catalog when set.
    pub listings: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            page_size: 6,
            calculator: CalculatorDefaults::default(),
            media_dir: PathBuf::from("media"),
            listings: None,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. No path, or a path that does not
    /// exist, yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
