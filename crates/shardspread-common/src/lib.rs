//! Shardspread Common - Shared types and utilities
//!
//! This crate provides common types, error definitions, and the flat
//! dynamic-settings map used across all Shardspread components.

pub mod error;
pub mod settings;
pub mod types;

pub use error::{Error, Result};
pub use settings::Settings;
pub use types::*;
