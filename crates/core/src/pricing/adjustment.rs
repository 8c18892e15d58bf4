//! Shop buy/sell price adjustment.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use coffer_shared::config::{AdjustmentConfig, PricingConfig};

use super::price::Price;

/// Key under which the fallback adjustment is edited.
pub const DEFAULT_ADJUSTMENT_KEY: &str = "default";

/// Buy/sell multipliers for one item type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Multiplier applied to the price when the shop sells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell: Option<Decimal>,
    /// Multiplier applied to the price when the shop buys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy: Option<Decimal>,
}

impl Adjustment {
    /// Returns true if neither multiplier is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sell.is_none() && self.buy.is_none()
    }
}

impl From<AdjustmentConfig> for Adjustment {
    fn from(config: AdjustmentConfig) -> Self {
        Self {
            sell: config.sell,
            buy: config.buy,
        }
    }
}

/// Reads a multiplier field. Empty, unreadable, and negative input is unset.
#[must_use]
pub fn parse_multiplier(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|value| !value.is_sign_negative())
}

/// A shop or loot item with a list price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Item id.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Item type, e.g. `weapon`.
    #[serde(rename = "type")]
    pub item_type: String,
    /// List price, e.g. `15 gp`.
    pub price: String,
    /// Adjusted selling cost, filled in by [`PriceAdjustments::apply_to_items`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
}

/// Fallback and per-type price adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceAdjustments {
    /// Used when an item type has no multiplier of its own.
    pub default: Adjustment,
    /// Adjustments keyed by item type.
    #[serde(default)]
    pub per_type: BTreeMap<String, Adjustment>,
}

impl PriceAdjustments {
    /// Builds adjustments from configured defaults.
    #[must_use]
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            default: config.default.into(),
            per_type: config
                .per_type
                .iter()
                .map(|(k, v)| (k.clone(), Adjustment::from(*v)))
                .collect(),
        }
    }

    /// Layers dialog overrides on top of these adjustments.
    ///
    /// Empty overrides are dropped. A non-empty override replaces the whole
    /// entry for its type; the `default` key replaces the fallback.
    #[must_use]
    pub fn merged(&self, overrides: &BTreeMap<String, Adjustment>) -> Self {
        let mut merged = self.clone();
        for (item_type, adjustment) in overrides {
            if adjustment.is_empty() {
                continue;
            }
            if item_type == DEFAULT_ADJUSTMENT_KEY {
                merged.default = *adjustment;
            } else {
                merged.per_type.insert(item_type.clone(), *adjustment);
            }
        }
        merged
    }

    /// Returns the selling multiplier for an item type.
    #[must_use]
    pub fn sell_multiplier(&self, item_type: &str) -> Decimal {
        self.per_type
            .get(item_type)
            .and_then(|a| a.sell)
            .or(self.default.sell)
            .unwrap_or(Decimal::ONE)
    }

    /// Returns the buying multiplier for an item type.
    #[must_use]
    pub fn buy_multiplier(&self, item_type: &str) -> Decimal {
        self.per_type
            .get(item_type)
            .and_then(|a| a.buy)
            .or(self.default.buy)
            .unwrap_or(Decimal::ONE)
    }

    /// Computes the selling cost of one item, rounded up to a whole coin.
    #[must_use]
    pub fn sell_cost(&self, item: &ShopItem, default_currency: &str) -> Price {
        let price = Price::parse(&item.price, default_currency);
        let value = (price.value * self.sell_multiplier(&item.item_type)).ceil();
        Price::new(value, price.currency)
    }

    /// Fills in the adjusted cost of every item.
    pub fn apply_to_items(&self, items: &mut [ShopItem], default_currency: &str) {
        for item in items.iter_mut() {
            let cost = self.sell_cost(item, default_currency);
            debug!(item = %item.id, price = %item.price, cost = %cost, "adjusted item cost");
            item.cost = Some(cost.to_string());
        }
    }
}

impl Default for PriceAdjustments {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}
