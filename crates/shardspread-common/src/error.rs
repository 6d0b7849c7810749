//! Error types for Shardspread
//!
//! This module defines the common error types used throughout the system.

use thiserror::Error;

/// Common result type for Shardspread operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for Shardspread
#[derive(Debug, Error)]
pub enum Error {
    // Caller-contract violations: the snapshot handed to the decider is
    // missing something the caller promised would be there.
    #[error("node not found in cluster snapshot: {0}")]
    NodeNotFound(String),

    #[error("index not found in cluster snapshot: {0}")]
    IndexNotFound(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this is a not found error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::IndexNotFound(_))
    }
}
