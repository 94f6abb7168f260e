// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for the three persisted entity types.
//!
//! Backed either by SQLite or an in-memory map; behavior is identical
//! either way and callers never observe which backend is configured.

use async_trait::async_trait;

use crate::error::WinbackError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{
    CartRecord, CartStatus, DeliveryStatus, NewCart, NewConversion, NewNotificationLog,
    SendHistory,
};

/// Durable (or in-memory, functionally equivalent) storage for cart records,
/// notification logs, and conversion records.
///
/// Mutations are sequentially consistent: each mutating call executes to
/// completion before the next one is observed.
#[async_trait]
pub trait RecordStore: ServiceAdapter {
    /// Initializes the backend (migrations, connections).
    async fn initialize(&self) -> Result<(), WinbackError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), WinbackError>;

    /// Inserts a new cart with status `pending` and `added_at` = now.
    /// Returns the assigned id.
    async fn create_cart(&self, cart: &NewCart) -> Result<i64, WinbackError>;

    /// Inserts a fully specified cart record, bypassing the pending/now
    /// defaults. The record's `id` field is ignored; the assigned id is
    /// returned. Used by demo seeding and backfills, never by the
    /// notify/convert transitions.
    async fn import_cart(&self, record: &CartRecord) -> Result<i64, WinbackError>;

    /// Fetches a cart by id.
    async fn get_cart(&self, id: i64) -> Result<Option<CartRecord>, WinbackError>;

    /// Dedup lookup: the latest (highest-id) cart for a (phone, product) pair.
    async fn find_latest_cart(
        &self,
        phone: &str,
        product: &str,
    ) -> Result<Option<CartRecord>, WinbackError>;

    /// Sets a cart's status and the matching timestamp (`notified_at` for
    /// `notified`, `purchased_at` for `converted`) to now.
    ///
    /// Returns the number of rows affected; a nonexistent id yields 0, not
    /// an error.
    async fn update_cart_status(
        &self,
        id: i64,
        status: CartStatus,
    ) -> Result<u64, WinbackError>;

    /// Refreshes a cart's amount fields in place (re-observed pending cart).
    /// Returns the number of rows affected.
    async fn update_cart_amounts(
        &self,
        id: i64,
        total_amount: i64,
        monthly_payment: i64,
    ) -> Result<u64, WinbackError>;

    /// Appends a notification log row. Returns the assigned id.
    async fn append_log(&self, log: &NewNotificationLog) -> Result<i64, WinbackError>;

    /// Appends a conversion record. Returns the assigned id.
    async fn append_conversion(&self, conversion: &NewConversion)
    -> Result<i64, WinbackError>;

    /// Counts carts, optionally restricted to the given statuses.
    async fn count_carts(&self, statuses: Option<&[CartStatus]>)
    -> Result<i64, WinbackError>;

    /// Counts notification logs, optionally restricted to one delivery status.
    async fn count_logs(&self, status: Option<DeliveryStatus>) -> Result<i64, WinbackError>;

    /// Counts conversion records.
    async fn count_conversions(&self) -> Result<i64, WinbackError>;

    /// Sums conversion amounts over all rows; 0 for an empty table.
    async fn sum_conversion_amounts(&self) -> Result<i64, WinbackError>;

    /// Send history for a (phone, product) pair: latest log timestamp and
    /// sent count, joined through the owning cart.
    async fn send_history(
        &self,
        phone: &str,
        product: &str,
    ) -> Result<SendHistory, WinbackError>;
}
