//! Core logic for Coffer.
//!
//! This crate contains pure model logic with no host or UI dependencies.
//! Everything it persists goes through the [`flags::FlagStore`] trait.
//!
//! # Modules
//!
//! - `currency` - Denomination tables, conversion, distribution and transfers
//! - `pricing` - Shop price parsing and buy/sell adjustment
//! - `ordering` - Drag-and-drop reordering of lists and page fields
//! - `records` - DC checks, traps, objectives and offerings
//! - `flags` - Document flag storage
//! - `loot` - Reading and writing loot documents through a flag store

pub mod currency;
pub mod flags;
pub mod loot;
pub mod ordering;
pub mod pricing;
pub mod records;
