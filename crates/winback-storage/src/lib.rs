// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store backends for the winback service.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`, plus a
//! behaviorally equivalent in-memory backend. Both implement the
//! [`RecordStore`] trait; callers select one by configuration and never
//! observe which backend is behind it.
//!
//! [`RecordStore`]: winback_core::RecordStore

pub mod adapter;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;

use std::sync::Arc;

use winback_config::model::StorageConfig;
use winback_core::{RecordStore, WinbackError};

pub use adapter::SqliteStore;
pub use database::Database;
pub use memory::MemoryStore;
pub use models::*;

/// Construct the record store backend named by the configuration.
///
/// The returned store is not yet initialized; callers run
/// [`RecordStore::initialize`] before first use.
pub fn store_from_config(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, WinbackError> {
    match config.backend.as_str() {
        "sqlite" => Ok(Arc::new(SqliteStore::new(config.clone()))),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(WinbackError::Config(format!(
            "unknown storage backend '{other}' (expected 'sqlite' or 'memory')"
        ))),
    }
}
