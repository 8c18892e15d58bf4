//! Moving coin between a loot source and one character.
//!
//! A positive amount is paid out of the loot to the character; a negative
//! amount is paid by the character into the loot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coffer_shared::types::{CoinPurse, DenominationId, parse_whole_amount};

/// Transfer validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The loot does not hold enough of a denomination.
    #[error("Loot does not have enough currency: {denomination} (required {required}, available {available})")]
    InsufficientLoot {
        /// Denomination short of funds.
        denomination: DenominationId,
        /// Amount requested.
        required: Decimal,
        /// Amount held.
        available: Decimal,
    },

    /// The character does not hold enough of a denomination.
    #[error("Actor does not have enough currency: {denomination} (required {required}, available {available})")]
    InsufficientActor {
        /// Denomination short of funds.
        denomination: DenominationId,
        /// Amount requested.
        required: Decimal,
        /// Amount held.
        available: Decimal,
    },
}

/// Draft of a currency transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTransfer {
    amounts: CoinPurse,
}

impl CurrencyTransfer {
    /// Creates an empty transfer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transfer from known amounts.
    #[must_use]
    pub fn from_amounts(amounts: CoinPurse) -> Self {
        Self { amounts }
    }

    /// Amounts per denomination.
    #[must_use]
    pub fn amounts(&self) -> &CoinPurse {
        &self.amounts
    }

    /// Returns true if nothing would move.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_all_zero()
    }

    /// Sets an amount from form input, capped at what the loot holds.
    ///
    /// Empty or invalid input reads as zero. Returns the stored amount.
    pub fn set_amount(
        &mut self,
        denomination: DenominationId,
        raw: &str,
        loot_available: Decimal,
    ) -> Decimal {
        let amount = parse_whole_amount(raw)
            .unwrap_or(Decimal::ZERO)
            .min(loot_available);
        self.amounts.set(denomination, amount);
        amount
    }

    /// Clears one denomination.
    pub fn clear(&mut self, denomination: &DenominationId) {
        self.amounts.set(denomination.clone(), Decimal::ZERO);
    }

    /// Clears every denomination.
    pub fn clear_all(&mut self) {
        self.amounts = CoinPurse::new();
    }

    /// Checks that both sides can cover the transfer.
    ///
    /// # Errors
    ///
    /// Returns the first denomination that either side cannot cover.
    pub fn validate(&self, loot: &CoinPurse, actor: &CoinPurse) -> Result<(), TransferError> {
        for (denomination, amount) in self.amounts.iter() {
            if amount.is_sign_negative() {
                let required = amount.abs();
                let available = actor.amount(denomination);
                if available < required {
                    return Err(TransferError::InsufficientActor {
                        denomination: denomination.clone(),
                        required,
                        available,
                    });
                }
            } else if *amount > Decimal::ZERO {
                let available = loot.amount(denomination);
                if available < *amount {
                    return Err(TransferError::InsufficientLoot {
                        denomination: denomination.clone(),
                        required: *amount,
                        available,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates and returns the new loot and character purses.
    ///
    /// # Errors
    ///
    /// Returns a `TransferError` if either side cannot cover the transfer.
    pub fn apply(
        &self,
        loot: &CoinPurse,
        actor: &CoinPurse,
    ) -> Result<(CoinPurse, CoinPurse), TransferError> {
        self.validate(loot, actor)?;

        let mut loot = loot.clone();
        let mut actor = actor.clone();
        for (denomination, amount) in self.amounts.iter() {
            if amount.is_zero() {
                continue;
            }
            actor.add(denomination.clone(), *amount);
            loot.add(denomination.clone(), -*amount);
        }
        Ok((loot, actor))
    }
}
