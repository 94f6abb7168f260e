// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the winback service.

use thiserror::Error;

/// The primary error type used across all winback adapter traits and core operations.
#[derive(Debug, Error)]
pub enum WinbackError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request validation errors (missing or malformed required fields).
    ///
    /// Always raised before any store mutation happens.
    #[error("validation error: {0}")]
    Validation(String),

    /// Record store errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Storefront collaborator errors (listing fetch, cart restore).
    #[error("storefront error: {message}")]
    Storefront {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Messaging collaborator errors (transport-level only -- a send the
    /// provider *reports* as failed is a normal [`SendReceipt`] outcome,
    /// not an error).
    ///
    /// [`SendReceipt`]: crate::types::SendReceipt
    #[error("messaging error: {message}")]
    Messaging {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
