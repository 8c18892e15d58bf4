//! Currency denomination definitions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::id::DenominationId;

/// One unit type of a currency system, e.g. gold or silver.
///
/// Tables list denominations highest value first. `convert` is how many units
/// of this denomination make up one unit of the table's base value; a
/// denomination without a rate cannot receive converted remainders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denomination {
    /// Short id, e.g. `gp`.
    pub id: DenominationId,
    /// Display name.
    pub name: String,
    /// Units of this denomination per base unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<Decimal>,
}

impl Denomination {
    /// Creates a denomination.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, convert: Option<Decimal>) -> Self {
        Self {
            id: DenominationId::new(id),
            name: name.into(),
            convert,
        }
    }

    /// Returns the rate if it is usable as a conversion target.
    ///
    /// Only a positive rate qualifies; zero and negative rates are treated
    /// like a missing one.
    #[must_use]
    pub fn rate(&self) -> Option<Decimal> {
        self.convert.filter(|rate| *rate > Decimal::ZERO)
    }

    /// Returns the rate used when this denomination is the source of a
    /// conversion. Missing and non-positive rates count as one.
    #[must_use]
    pub fn source_rate(&self) -> Decimal {
        self.rate().unwrap_or(Decimal::ONE)
    }
}

/// The classic five-coin table: platinum, gold, electrum, silver, copper.
#[must_use]
pub fn default_denominations() -> Vec<Denomination> {
    vec![
        Denomination::new("pp", "Platinum", Some(dec!(0.1))),
        Denomination::new("gp", "Gold", Some(Decimal::ONE)),
        Denomination::new("ep", "Electrum", Some(dec!(2))),
        Denomination::new("sp", "Silver", Some(dec!(10))),
        Denomination::new("cp", "Copper", Some(dec!(100))),
    ]
}
