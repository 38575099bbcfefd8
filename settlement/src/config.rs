//! Configuration for settlement engine

use crate::{netting::DEFAULT_TOLERANCE, types::SettlementPolicy};
use message_bus::PublisherConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Which settlements reduce balances
    pub policy: SettlementPolicy,

    /// Netting configuration
    pub netting: NettingConfig,

    /// Trip ledger configuration
    pub ledger: trip_ledger::Config,

    /// Trip room configuration
    pub feed: PublisherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            policy: SettlementPolicy::default(),
            netting: NettingConfig::default(),
            ledger: trip_ledger::Config::default(),
            feed: PublisherConfig::default(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Balances within this distance of zero count as settled
    pub tolerance: Decimal,

    /// Fail plans and summaries whose balances do not net to zero
    /// instead of reporting the imbalance
    pub strict_conservation: bool,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            strict_conservation: false,
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
        let mut config = Config {
            ledger: trip_ledger::Config::from_env()?,
            ..Config::default()
        };

        if let Ok(policy) = std::env::var("TRIPSPLIT_SETTLEMENT_POLICY") {
            config.policy = policy.parse()?;
        }

        if let Ok(tolerance) = std::env::var("TRIPSPLIT_NETTING_TOLERANCE") {
            config.netting.tolerance = Decimal::from_str(&tolerance).map_err(|e| {
                crate::Error::Config(format!("Invalid TRIPSPLIT_NETTING_TOLERANCE: {}", e))
            })?;
        }

        if let Ok(strict) = std::env::var("TRIPSPLIT_STRICT_CONSERVATION") {
            config.netting.strict_conservation = strict.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid TRIPSPLIT_STRICT_CONSERVATION: {}", e))
            })?;
        }

        if let Ok(capacity) = std::env::var("TRIPSPLIT_FEED_CAPACITY") {
            config.feed.channel_capacity = capacity.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid TRIPSPLIT_FEED_CAPACITY: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants
    pub fn validate(&self) -> crate::Result<()> {
        if self.netting.tolerance <= Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "netting.tolerance must be positive, got {}",
                self.netting.tolerance
            )));
        }
        if self.feed.channel_capacity == 0 {
            return Err(crate::Error::Config(
                "feed.channel_capacity must be at least 1".to_string(),
            ));
        }
        self.ledger.validate()?;
        Ok(())
    }
}
