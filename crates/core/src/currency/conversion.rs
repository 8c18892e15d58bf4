//! Denomination conversion logic.
//!
//! Rates are "units per base unit": with gold at 1 and silver at 10, one gold
//! is worth ten silver. Converting multiplies by the target's rate and divides
//! by the source's. No rounding is applied; fractional coins are kept exactly.

use rust_decimal::Decimal;

use coffer_shared::types::Denomination;

/// Converts an amount of `from` into units of `to`.
///
/// Returns `None` when `to` has no positive conversion rate. A missing or
/// non-positive rate on `from` counts as one.
#[must_use]
pub fn convert_between(amount: Decimal, from: &Denomination, to: &Denomination) -> Option<Decimal> {
    let to_rate = to.rate()?;
    Some(amount * to_rate / from.source_rate())
}

/// Returns the value of an amount of `denomination` in base units.
#[must_use]
pub fn base_value(amount: Decimal, denomination: &Denomination) -> Decimal {
    amount / denomination.source_rate()
}
