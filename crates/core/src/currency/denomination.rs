//! Ordered denomination tables and the currency table editor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coffer_shared::types::{Denomination, DenominationId, default_denominations};

/// Errors raised while editing a denomination table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DenominationError {
    /// No denomination has this id.
    #[error("Denomination not found: {0}")]
    NotFound(DenominationId),

    /// Another denomination already uses this id.
    #[error("Denomination id already in use: {0}")]
    Conflict(DenominationId),
}

/// Denominations ordered highest value first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenominationTable(Vec<Denomination>);

impl DenominationTable {
    /// Creates a table from denominations already in value order.
    #[must_use]
    pub fn new(denominations: Vec<Denomination>) -> Self {
        Self(denominations)
    }

    /// The classic platinum-to-copper table.
    #[must_use]
    pub fn defaults() -> Self {
        Self(default_denominations())
    }

    /// Returns the denominations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Denomination] {
        &self.0
    }

    /// Number of denominations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the table has no denominations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over denominations in value order.
    pub fn iter(&self) -> impl Iterator<Item = &Denomination> {
        self.0.iter()
    }

    /// Iterates over denomination ids in value order.
    pub fn ids(&self) -> impl Iterator<Item = &DenominationId> {
        self.0.iter().map(|d| &d.id)
    }

    /// Looks up a denomination by id.
    #[must_use]
    pub fn get(&self, id: &DenominationId) -> Option<&Denomination> {
        self.0.iter().find(|d| &d.id == id)
    }

    /// Returns the position of a denomination in the table.
    #[must_use]
    pub fn position(&self, id: &DenominationId) -> Option<usize> {
        self.0.iter().position(|d| &d.id == id)
    }

    /// Returns the first denomination after `index` that has a positive
    /// conversion rate.
    #[must_use]
    pub fn next_convertible_after(&self, index: usize) -> Option<&Denomination> {
        self.0.iter().skip(index + 1).find(|d| d.rate().is_some())
    }

    /// Denominations that may be offered or transferred (those with a
    /// positive rate).
    pub fn transferable(&self) -> impl Iterator<Item = &Denomination> {
        self.0.iter().filter(|d| d.rate().is_some())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Appends a blank row with a conversion rate of one.
    pub fn add_blank(&mut self) {
        self.0
            .push(Denomination::new(String::new(), String::new(), Some(Decimal::ONE)));
    }

    /// Changes a denomination's id.
    ///
    /// The new id keeps only ASCII letters and `-`. Returns the id actually
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `old` does not exist and `Conflict` if another
    /// denomination already uses the sanitised id.
    pub fn rename(
        &mut self,
        old: &DenominationId,
        new: &str,
    ) -> Result<DenominationId, DenominationError> {
        let sanitized = DenominationId::new(sanitize_id(new));
        let index = self
            .position(old)
            .ok_or_else(|| DenominationError::NotFound(old.clone()))?;

        if &sanitized == old {
            return Ok(sanitized);
        }
        if self.get(&sanitized).is_some() {
            return Err(DenominationError::Conflict(sanitized));
        }

        self.0[index].id = sanitized.clone();
        Ok(sanitized)
    }

    /// Changes a denomination's display name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id does not exist.
    pub fn set_name(&mut self, id: &DenominationId, name: &str) -> Result<(), DenominationError> {
        self.entry_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Changes a denomination's conversion rate from form input.
    ///
    /// Input that is not a positive number stores a rate of one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id does not exist.
    pub fn set_convert(&mut self, id: &DenominationId, raw: &str) -> Result<Decimal, DenominationError> {
        let rate = raw
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|rate| *rate > Decimal::ZERO)
            .unwrap_or(Decimal::ONE);
        self.entry_mut(id)?.convert = Some(rate);
        Ok(rate)
    }

    /// Removes a denomination. Returns false if it did not exist.
    pub fn remove(&mut self, id: &DenominationId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Restores the default table.
    pub fn reset(&mut self) {
        *self = Self::defaults();
    }

    /// Returns the table as it should be saved: rows missing an id or a
    /// name are dropped.
    #[must_use]
    pub fn finalize(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|d| !d.id.is_empty() && !d.name.is_empty())
                .cloned()
                .collect(),
        )
    }

    fn entry_mut(&mut self, id: &DenominationId) -> Result<&mut Denomination, DenominationError> {
        self.0
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| DenominationError::NotFound(id.clone()))
    }
}

impl Default for DenominationTable {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<Vec<Denomination>> for DenominationTable {
    fn from(denominations: Vec<Denomination>) -> Self {
        Self(denominations)
    }
}

fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '-')
        .collect()
}
