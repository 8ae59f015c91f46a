//! Runtime configuration from environment variables
//!
//!   COUNTRY_CATEGORIES_PATH   country category CSV (default: data/country_categories.csv)
//!   COUNTRY_INFO_PATH         country information JSON (default: data/country_info.json)
//!   DEFAULT_FINANCED_PERCENT  financed share when a request omits it (default: 85)

use crate::classification::directory::{DEFAULT_CATEGORIES_PATH, DEFAULT_INFO_PATH};
use crate::classification::CountryDirectory;
use crate::error::PremiumError;
use crate::premium::DEFAULT_FINANCED_PERCENT;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub categories_path: PathBuf,
    pub info_path: PathBuf,
    pub default_financed_percent: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories_path: PathBuf::from(DEFAULT_CATEGORIES_PATH),
            info_path: PathBuf::from(DEFAULT_INFO_PATH),
            default_financed_percent: DEFAULT_FINANCED_PERCENT,
        }
    }
}

impl Config {
    /// Read config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (used by `from_env` and tests)
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();

        let categories_path = lookup("COUNTRY_CATEGORIES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.categories_path);

        let info_path = lookup("COUNTRY_INFO_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.info_path);

        let default_financed_percent = lookup("DEFAULT_FINANCED_PERCENT")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|p| (0.0..=100.0).contains(p))
            .unwrap_or(defaults.default_financed_percent);

        Self {
            categories_path,
            info_path,
            default_financed_percent,
        }
    }

    /// Load the country directory named by this config
    pub fn load_directory(&self) -> Result<CountryDirectory, PremiumError> {
        CountryDirectory::load(&self.categories_path, Some(&self.info_path))
    }
}
