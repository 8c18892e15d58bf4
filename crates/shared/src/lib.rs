//! Shared types, errors, and configuration for Coffer.
//!
//! This crate provides common types used across all other crates:
//! - Coin purses and per-character coin amounts with decimal precision
//! - Typed IDs for documents, denominations, and records
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
