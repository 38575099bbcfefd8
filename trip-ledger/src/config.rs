//! Configuration for the trip ledger

use crate::{types::Currency, validation::SPLIT_TOLERANCE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest accepted gap between an expense amount and its split total
    pub split_tolerance: Decimal,

    /// Currency for trips opened without an explicit one
    pub default_currency: Currency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            split_tolerance: SPLIT_TOLERANCE,
            default_currency: Currency::USD,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(tolerance) = std::env::var("TRIPSPLIT_SPLIT_TOLERANCE") {
            config.split_tolerance = Decimal::from_str(&tolerance).map_err(|e| {
                crate::Error::Config(format!("Invalid TRIPSPLIT_SPLIT_TOLERANCE: {}", e))
            })?;
        }

        if let Ok(currency) = std::env::var("TRIPSPLIT_CURRENCY") {
            config.default_currency = currency.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants
    pub fn validate(&self) -> crate::Result<()> {
        if self.split_tolerance < Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "split_tolerance must not be negative, got {}",
                self.split_tolerance
            )));
        }
        Ok(())
    }
}
