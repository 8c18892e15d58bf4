//! Coin amounts keyed by denomination.
//!
//! CRITICAL: Never use floating-point for currency calculations.
//! Amounts wrap `rust_decimal::Decimal`; conversion between denominations may
//! produce fractions, which are kept exactly.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::DenominationId;

/// Amounts of coin per denomination.
///
/// Missing denominations read as zero. Used for loot pools, original pool
/// snapshots, totals, and character holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinPurse(BTreeMap<DenominationId, Decimal>);

impl CoinPurse {
    /// Creates an empty purse.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the amount held for a denomination (zero when absent).
    #[must_use]
    pub fn amount(&self, id: &DenominationId) -> Decimal {
        self.0.get(id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sets the amount for a denomination.
    pub fn set(&mut self, id: DenominationId, amount: Decimal) {
        self.0.insert(id, amount);
    }

    /// Adds to the amount for a denomination.
    pub fn add(&mut self, id: DenominationId, amount: Decimal) {
        *self.0.entry(id).or_insert(Decimal::ZERO) += amount;
    }

    /// Returns true if the purse has an entry for the denomination.
    #[must_use]
    pub fn contains(&self, id: &DenominationId) -> bool {
        self.0.contains_key(id)
    }

    /// Iterates over `(denomination, amount)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&DenominationId, &Decimal)> {
        self.0.iter()
    }

    /// Iterates over the denominations present.
    pub fn ids(&self) -> impl Iterator<Item = &DenominationId> {
        self.0.keys()
    }

    /// Returns true if no denomination has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if every entry is zero.
    #[must_use]
    pub fn is_all_zero(&self) -> bool {
        self.0.values().all(Decimal::is_zero)
    }

    /// Sets every entry to zero, keeping the denominations.
    pub fn zero_all(&mut self) {
        for amount in self.0.values_mut() {
            *amount = Decimal::ZERO;
        }
    }

    /// Adds every entry of `other` into this purse.
    pub fn absorb(&mut self, other: &Self) {
        for (id, amount) in other.iter() {
            self.add(id.clone(), *amount);
        }
    }
}

impl FromIterator<(DenominationId, Decimal)> for CoinPurse {
    fn from_iter<T: IntoIterator<Item = (DenominationId, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A character's holding of one denomination while currency is being split.
///
/// `Excluded` is the "leave me out of this split" marker; it serialises as the
/// empty string. It is distinct from `Held(0)`, which takes part in the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCoin", into = "RawCoin")]
pub enum CoinAmount {
    /// Included in splits, currently holding this amount.
    Held(Decimal),
    /// Excluded from splits of this denomination.
    Excluded,
}

impl CoinAmount {
    /// A zero holding that takes part in splits.
    pub const ZERO: Self = Self::Held(Decimal::ZERO);

    /// Returns true if this holding is excluded from splits.
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        matches!(self, Self::Excluded)
    }

    /// Returns the held amount, counting an excluded holding as zero.
    #[must_use]
    pub const fn held(&self) -> Decimal {
        match self {
            Self::Held(amount) => *amount,
            Self::Excluded => Decimal::ZERO,
        }
    }

    /// Returns the held amount, or `None` when excluded.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        match self {
            Self::Held(amount) => Some(*amount),
            Self::Excluded => None,
        }
    }
}

impl Default for CoinAmount {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Wire form of [`CoinAmount`]: a decimal or the empty-string marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCoin {
    Value(Decimal),
    Text(String),
}

impl TryFrom<RawCoin> for CoinAmount {
    type Error = String;

    fn try_from(raw: RawCoin) -> Result<Self, Self::Error> {
        match raw {
            RawCoin::Value(amount) => Ok(Self::Held(amount)),
            RawCoin::Text(text) if text.trim().is_empty() => Ok(Self::Excluded),
            RawCoin::Text(text) => text
                .trim()
                .parse::<Decimal>()
                .map(Self::Held)
                .map_err(|_| format!("Invalid coin amount: {text}")),
        }
    }
}

impl From<CoinAmount> for RawCoin {
    fn from(amount: CoinAmount) -> Self {
        match amount {
            CoinAmount::Held(value) => Self::Value(value),
            CoinAmount::Excluded => Self::Text(String::new()),
        }
    }
}

/// Parses the leading whole number of a form field.
///
/// Mirrors how number inputs are read by the dialogs: leading whitespace is
/// skipped, an optional sign is accepted, and parsing stops at the first
/// non-digit (`"12gp"` reads as 12). Returns `None` when no digit is found.
#[must_use]
pub fn parse_whole_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value = Decimal::from_str_exact(&rest[..digits_len]).ok()?;
    Some(if negative { -value } else { value })
}
