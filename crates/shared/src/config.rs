//! Application configuration management.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{Denomination, default_denominations};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Currency table configuration.
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Loot distribution settings.
    #[serde(default)]
    pub distribution: DistributionConfig,
    /// Shop price adjustment defaults.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Flag store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Currency table configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Denominations, highest value first.
    #[serde(default = "default_denominations")]
    pub denominations: Vec<Denomination>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            denominations: default_denominations(),
        }
    }
}

/// Loot distribution settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DistributionConfig {
    /// Split the pool evenly as soon as a distribution is opened.
    #[serde(default)]
    pub auto_distribute: bool,
    /// Convert split remainders into the next smaller denomination.
    #[serde(default = "default_convert_remainder")]
    pub convert_remainder: bool,
}

fn default_convert_remainder() -> bool {
    true
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            auto_distribute: false,
            convert_remainder: default_convert_remainder(),
        }
    }
}

/// Buy/sell multipliers for one item type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AdjustmentConfig {
    /// Multiplier applied when the shop sells.
    #[serde(default)]
    pub sell: Option<Decimal>,
    /// Multiplier applied when the shop buys.
    #[serde(default)]
    pub buy: Option<Decimal>,
}

/// Shop price adjustment defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Adjustment used when an item type has none of its own.
    #[serde(default = "default_adjustment")]
    pub default: AdjustmentConfig,
    /// Adjustments keyed by item type.
    #[serde(default)]
    pub per_type: BTreeMap<String, AdjustmentConfig>,
    /// Currency assumed for prices written without one.
    #[serde(default = "default_price_currency")]
    pub default_currency: String,
}

fn default_adjustment() -> AdjustmentConfig {
    AdjustmentConfig {
        sell: Some(Decimal::ONE),
        buy: Some(Decimal::new(5, 1)),
    }
}

fn default_price_currency() -> String {
    "gp".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default: default_adjustment(),
            per_type: BTreeMap::new(),
            default_currency: default_price_currency(),
        }
    }
}

/// Flag store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON flag file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Namespace flags are written under.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/flags.json")
}

fn default_namespace() -> String {
    "coffer".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            namespace: default_namespace(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `COFFER__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("COFFER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
