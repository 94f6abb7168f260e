// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a real record store together with mock collaborators.
//!
//! Defaults to the in-memory store; `with_sqlite()` switches to a temp-dir
//! SQLite database that lives as long as the harness.

use std::sync::Arc;

use winback_config::model::StorageConfig;
use winback_core::types::CartListing;
use winback_core::{RecordStore, WinbackError};
use winback_storage::{MemoryStore, SqliteStore};

use crate::mock_messenger::MockMessenger;
use crate::mock_storefront::MockStorefront;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    use_sqlite: bool,
    listings: Vec<CartListing>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            use_sqlite: false,
            listings: Vec::new(),
        }
    }

    /// Back the record store with a temp-dir SQLite database instead of
    /// the in-memory store.
    pub fn with_sqlite(mut self) -> Self {
        self.use_sqlite = true;
        self
    }

    /// Seed the mock storefront with these listings.
    pub fn with_listings(mut self, listings: Vec<CartListing>) -> Self {
        self.listings = listings;
        self
    }

    /// Build the harness, initializing the chosen store.
    pub async fn build(self) -> Result<TestHarness, WinbackError> {
        let (store, temp_dir): (Arc<dyn RecordStore>, Option<tempfile::TempDir>) =
            if self.use_sqlite {
                let temp_dir = tempfile::TempDir::new()
                    .map_err(|e| WinbackError::Storage { source: e.into() })?;
                let db_path = temp_dir.path().join("harness.db");
                let store = SqliteStore::new(StorageConfig {
                    backend: "sqlite".to_string(),
                    database_path: db_path.to_string_lossy().into_owned(),
                });
                (Arc::new(store), Some(temp_dir))
            } else {
                (Arc::new(MemoryStore::new()), None)
            };
        store.initialize().await?;

        Ok(TestHarness {
            store,
            messenger: Arc::new(MockMessenger::new()),
            storefront: Arc::new(MockStorefront::new(self.listings)),
            _temp_dir: temp_dir,
        })
    }
}

/// An initialized record store plus mock collaborators.
pub struct TestHarness {
    pub store: Arc<dyn RecordStore>,
    pub messenger: Arc<MockMessenger>,
    pub storefront: Arc<MockStorefront>,
    // Keeps the SQLite database directory alive for the harness lifetime.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winback_core::types::NewCart;

    #[tokio::test]
    async fn memory_harness_starts_empty() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert_eq!(harness.store.count_carts(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sqlite_harness_persists_within_lifetime() {
        let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
        harness
            .store
            .create_cart(&NewCart {
                customer_name: "김철수".to_string(),
                customer_phone: "010-1111-2222".to_string(),
                product_name: "가방".to_string(),
                total_amount: 120_000,
                monthly_payment: 10_000,
                installment_months: 12,
            })
            .await
            .unwrap();
        assert_eq!(harness.store.count_carts(None).await.unwrap(), 1);
    }
}
