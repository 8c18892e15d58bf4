//! Loot service error types.

use thiserror::Error;

use coffer_shared::AppError;

use crate::currency::{DenominationError, TransferError};
use crate::flags::FlagError;
use crate::records::RecordError;

/// Errors from reading or writing loot documents.
#[derive(Debug, Error)]
pub enum LootError {
    /// Flag storage failed.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// A record list could not be updated.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A currency transfer was rejected.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// The denomination table is unusable.
    #[error(transparent)]
    Denomination(#[from] DenominationError),
}

impl From<LootError> for AppError {
    fn from(err: LootError) -> Self {
        match err {
            LootError::Flag(e) => Self::Storage(e.to_string()),
            LootError::Record(RecordError::Flag(e)) => Self::Storage(e.to_string()),
            LootError::Record(RecordError::NotFound(id)) => Self::NotFound(format!("record {id}")),
            LootError::Record(e) => Self::Validation(e.to_string()),
            LootError::Transfer(e) => Self::BusinessRule(e.to_string()),
            LootError::Denomination(DenominationError::NotFound(id)) => {
                Self::NotFound(format!("denomination {id}"))
            }
            LootError::Denomination(e) => Self::Conflict(e.to_string()),
        }
    }
}
