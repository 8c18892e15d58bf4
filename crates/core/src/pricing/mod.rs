//! Shop pricing: price parsing and buy/sell adjustment.

pub mod adjustment;
pub mod price;

pub use adjustment::{Adjustment, PriceAdjustments, ShopItem, parse_multiplier};
pub use price::Price;
