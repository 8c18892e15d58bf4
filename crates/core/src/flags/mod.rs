//! Document flag storage.
//!
//! Every persisted value (loot currency, record lists, offerings) is a JSON
//! flag on a host document, addressed by document, namespace and key.

mod error;
mod file;
mod memory;
mod store;

pub use error::FlagError;
pub use file::JsonFileFlagStore;
pub use memory::{FlagTable, MemoryFlagStore};
pub use store::{FlagScope, FlagStore};
