use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

use reward_distribution::models::reward::{
    default_min_dispatch_amount, DEFAULT_MEMO_PREFIX, DEFAULT_PAYOUT_PRECISION,
};

/// Configuration for the delegator-return CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default account whose delegators are paid
    pub tracked_account: Option<String>,
    /// Default account payouts are sent from
    pub paying_account: Option<String>,
    /// Percentage of curation rewards returned to delegators
    pub return_percent: Decimal,
    /// Default lookback window in days
    pub window_days: u32,
    /// Decimal places payouts are rounded to
    pub payout_precision: u32,
    /// Payouts at or below this amount are not sent
    pub min_dispatch_amount: Decimal,
    /// Transfer memo prefix, followed by the reward window
    pub memo_prefix: String,
    /// Directory transfer instruction files are written to
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracked_account: None,
            paying_account: None,
            return_percent: Decimal::from(50),
            window_days: 7,
            payout_precision: DEFAULT_PAYOUT_PRECISION,
            min_dispatch_amount: default_min_dispatch_amount(),
            memo_prefix: DEFAULT_MEMO_PREFIX.to_string(),
            output_dir: Some(dirs::home_dir().unwrap_or_default().join(".delegator-return")),
        }
    }
}

impl Config {
    /// Location of the configuration file
    pub fn path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    fn config_dir() -> PathBuf {
        dirs::config_dir().unwrap_or_default().join("delegator-return")
    }

    /// Load configuration from file
    pub fn load() -> Result<Self, io::Error> {
        let config_path = Self::path();

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self, io::Error> {
        let config_str = fs::read_to_string(config_path)?;
        toml::from_str::<Config>(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), io::Error> {
        fs::create_dir_all(Self::config_dir())?;
        fs::write(Self::path(), self.to_toml()?)
    }

    pub fn to_toml(&self) -> Result<String, io::Error> {
        toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
