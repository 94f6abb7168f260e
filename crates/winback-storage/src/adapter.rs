// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use winback_config::model::StorageConfig;
use winback_core::types::{
    CartRecord, CartStatus, DeliveryStatus, NewCart, NewConversion, NewNotificationLog,
    SendHistory,
};
use winback_core::{AdapterType, HealthStatus, RecordStore, ServiceAdapter, WinbackError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed record store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`RecordStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`RecordStore::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, WinbackError> {
        self.db.get().ok_or_else(|| WinbackError::Storage {
            source: "record store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl ServiceAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, WinbackError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WinbackError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn initialize(&self) -> Result<(), WinbackError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path).await?;
        self.db.set(db).map_err(|_| WinbackError::Storage {
            source: "record store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite record store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), WinbackError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Cart operations ---

    async fn create_cart(&self, cart: &NewCart) -> Result<i64, WinbackError> {
        queries::carts::create_cart(self.db()?, cart).await
    }

    async fn import_cart(&self, record: &CartRecord) -> Result<i64, WinbackError> {
        queries::carts::import_cart(self.db()?, record).await
    }

    async fn get_cart(&self, id: i64) -> Result<Option<CartRecord>, WinbackError> {
        queries::carts::get_cart(self.db()?, id).await
    }

    async fn find_latest_cart(
        &self,
        phone: &str,
        product: &str,
    ) -> Result<Option<CartRecord>, WinbackError> {
        queries::carts::find_latest_cart(self.db()?, phone, product).await
    }

    async fn update_cart_status(
        &self,
        id: i64,
        status: CartStatus,
    ) -> Result<u64, WinbackError> {
        queries::carts::update_cart_status(self.db()?, id, status).await
    }

    async fn update_cart_amounts(
        &self,
        id: i64,
        total_amount: i64,
        monthly_payment: i64,
    ) -> Result<u64, WinbackError> {
        queries::carts::update_cart_amounts(self.db()?, id, total_amount, monthly_payment).await
    }

    // --- Append-only child records ---

    async fn append_log(&self, log: &NewNotificationLog) -> Result<i64, WinbackError> {
        queries::logs::append_log(self.db()?, log).await
    }

    async fn append_conversion(
        &self,
        conversion: &NewConversion,
    ) -> Result<i64, WinbackError> {
        queries::conversions::append_conversion(self.db()?, conversion).await
    }

    // --- Aggregate reads ---

    async fn count_carts(
        &self,
        statuses: Option<&[CartStatus]>,
    ) -> Result<i64, WinbackError> {
        queries::carts::count_carts(self.db()?, statuses).await
    }

    async fn count_logs(&self, status: Option<DeliveryStatus>) -> Result<i64, WinbackError> {
        queries::logs::count_logs(self.db()?, status).await
    }

    async fn count_conversions(&self) -> Result<i64, WinbackError> {
        queries::conversions::count_conversions(self.db()?).await
    }

    async fn sum_conversion_amounts(&self) -> Result<i64, WinbackError> {
        queries::conversions::sum_conversion_amounts(self.db()?).await
    }

    async fn send_history(
        &self,
        phone: &str,
        product: &str,
    ) -> Result<SendHistory, WinbackError> {
        queries::logs::send_history(self.db()?, phone, product).await
    }
}
