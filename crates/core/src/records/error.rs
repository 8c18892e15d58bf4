//! Journal record error types.

use thiserror::Error;

use coffer_shared::types::RecordId;

use crate::flags::FlagError;

/// Journal record errors.
#[derive(Debug, Error)]
pub enum RecordError {
    /// No record with this id exists in the list.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// An offered item must have a positive quantity.
    #[error("item '{item}' needs a positive quantity, got {qty}")]
    InvalidQuantity {
        /// Item id.
        item: String,
        /// Requested quantity.
        qty: i64,
    },

    /// The offering has nothing in it.
    #[error("offering is empty")]
    EmptyOffering,

    /// Reading or writing the record list failed.
    #[error(transparent)]
    Flag(#[from] FlagError),
}
