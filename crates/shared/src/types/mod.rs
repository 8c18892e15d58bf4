//! Common types used across the workspace.

pub mod coin;
pub mod denomination;
pub mod id;

pub use coin::{CoinAmount, CoinPurse, parse_whole_amount};
pub use denomination::{Denomination, default_denominations};
pub use id::*;
