//! Loot documents: coin distribution, transfers and journal record writes
//! over a flag store.

mod error;
mod service;

pub use error::LootError;
pub use service::{
    ADJUSTMENT_KEY, CURRENCY_KEY, ITEMS_KEY, LootService, RelayRequest, Submission, WriteAuthority,
};
