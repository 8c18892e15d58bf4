//! Item prices written as "amount currency", e.g. `12 gp`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parsed item price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Numeric amount.
    pub value: Decimal,
    /// Currency id, e.g. `gp`.
    pub currency: String,
}

impl Price {
    /// Creates a price.
    #[must_use]
    pub fn new(value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            value,
            currency: currency.into(),
        }
    }

    /// Parses a price string.
    ///
    /// The leading number is the value and the rest is the currency. A bare
    /// number takes `default_currency`; an unreadable number reads as zero.
    #[must_use]
    pub fn parse(raw: &str, default_currency: &str) -> Self {
        let trimmed = raw.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == ','))
            .unwrap_or(trimmed.len());
        let (number, rest) = trimmed.split_at(split);

        let value = number
            .replace(',', "")
            .parse::<Decimal>()
            .unwrap_or(Decimal::ZERO);
        let currency = rest.trim();
        let currency = if currency.is_empty() {
            default_currency
        } else {
            currency
        };

        Self::new(value, currency)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value.normalize(), self.currency)
    }
}
