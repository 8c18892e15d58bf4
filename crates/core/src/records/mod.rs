//! Journal records kept as lists in document flags.
//!
//! | Record | Flag key | New records go |
//! |--------|----------|----------------|
//! | [`DcCheck`] | `dcs` | last |
//! | [`Trap`] | `traps` | last |
//! | [`Objective`] | `objectives` | last |
//! | [`Offering`] | `offerings` | first |

pub mod collection;
pub mod dc;
mod error;
pub mod objective;
pub mod offering;
pub mod trap;

pub use collection::{FlagRecord, InsertPosition, find, load, remove, save, upsert};
pub use dc::{AttributeCatalog, AttributeGroup, AttributeRef, DcCheck, OptionMap, SystemOptions};
pub use error::RecordError;
pub use objective::Objective;
pub use offering::{ActorRef, OfferedItem, Offering, OfferingState};
pub use trap::Trap;
