// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the RecordStore trait.
//!
//! Behaviorally equivalent to the SQLite backend but with no persistence
//! across restarts. All tables live behind one mutex, so every mutating
//! call executes to completion before the next is observed (the sequential
//! consistency the trait contract requires).

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use winback_core::types::{
    now_utc, CartRecord, CartStatus, ConversionRecord, DeliveryStatus, NewCart, NewConversion,
    NewNotificationLog, NotificationLog, SendHistory,
};
use winback_core::{AdapterType, HealthStatus, RecordStore, ServiceAdapter, WinbackError};

#[derive(Default)]
struct Inner {
    carts: Vec<CartRecord>,
    logs: Vec<NotificationLog>,
    conversions: Vec<ConversionRecord>,
    next_cart_id: i64,
    next_log_id: i64,
    next_conversion_id: i64,
}

impl Inner {
    fn new() -> Self {
        Self {
            next_cart_id: 1,
            next_log_id: 1,
            next_conversion_id: 1,
            ..Self::default()
        }
    }
}

/// In-memory record store for the `memory` backend and tests.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, WinbackError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WinbackError> {
        debug!("memory store shutting down, records discarded");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn initialize(&self) -> Result<(), WinbackError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), WinbackError> {
        Ok(())
    }

    async fn create_cart(&self, cart: &NewCart) -> Result<i64, WinbackError> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_cart_id;
        inner.next_cart_id += 1;
        inner.carts.push(CartRecord {
            id,
            customer_name: cart.customer_name.clone(),
            customer_phone: cart.customer_phone.clone(),
            product_name: cart.product_name.clone(),
            total_amount: cart.total_amount,
            monthly_payment: cart.monthly_payment,
            installment_months: cart.installment_months,
            added_at: now_utc(),
            notified_at: None,
            purchased_at: None,
            status: CartStatus::Pending,
        });
        Ok(id)
    }

    async fn import_cart(&self, record: &CartRecord) -> Result<i64, WinbackError> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_cart_id;
        inner.next_cart_id += 1;
        inner.carts.push(CartRecord {
            id,
            ..record.clone()
        });
        Ok(id)
    }

    async fn get_cart(&self, id: i64) -> Result<Option<CartRecord>, WinbackError> {
        let inner = self.inner.lock().await;
        Ok(inner.carts.iter().find(|c| c.id == id).cloned())
    }

    async fn find_latest_cart(
        &self,
        phone: &str,
        product: &str,
    ) -> Result<Option<CartRecord>, WinbackError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .carts
            .iter()
            .filter(|c| c.customer_phone == phone && c.product_name == product)
            .max_by_key(|c| c.id)
            .cloned())
    }

    async fn update_cart_status(
        &self,
        id: i64,
        status: CartStatus,
    ) -> Result<u64, WinbackError> {
        let mut inner = self.inner.lock().await;
        match inner.carts.iter_mut().find(|c| c.id == id) {
            Some(cart) => {
                cart.status = status;
                match status {
                    CartStatus::Notified => cart.notified_at = Some(now_utc()),
                    CartStatus::Converted => cart.purchased_at = Some(now_utc()),
                    _ => {}
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_cart_amounts(
        &self,
        id: i64,
        total_amount: i64,
        monthly_payment: i64,
    ) -> Result<u64, WinbackError> {
        let mut inner = self.inner.lock().await;
        match inner.carts.iter_mut().find(|c| c.id == id) {
            Some(cart) => {
                cart.total_amount = total_amount;
                cart.monthly_payment = monthly_payment;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn append_log(&self, log: &NewNotificationLog) -> Result<i64, WinbackError> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_log_id;
        inner.next_log_id += 1;
        inner.logs.push(NotificationLog {
            id,
            abandoned_cart_id: log.abandoned_cart_id,
            message_id: log.message_id.clone(),
            phone: log.phone.clone(),
            message: log.message.clone(),
            sent_at: log.sent_at.clone().unwrap_or_else(now_utc),
            status: log.status,
            error_message: log.error_message.clone(),
        });
        Ok(id)
    }

    async fn append_conversion(
        &self,
        conversion: &NewConversion,
    ) -> Result<i64, WinbackError> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_conversion_id;
        inner.next_conversion_id += 1;
        inner.conversions.push(ConversionRecord {
            id,
            abandoned_cart_id: conversion.abandoned_cart_id,
            order_id: conversion.order_id.clone(),
            payment_method: conversion.payment_method.clone(),
            amount: conversion.amount,
            installment_months: conversion.installment_months,
            converted_at: conversion.converted_at.clone().unwrap_or_else(now_utc),
        });
        Ok(id)
    }

    async fn count_carts(
        &self,
        statuses: Option<&[CartStatus]>,
    ) -> Result<i64, WinbackError> {
        let inner = self.inner.lock().await;
        let count = match statuses {
            Some(wanted) => inner
                .carts
                .iter()
                .filter(|c| wanted.contains(&c.status))
                .count(),
            None => inner.carts.len(),
        };
        Ok(count as i64)
    }

    async fn count_logs(&self, status: Option<DeliveryStatus>) -> Result<i64, WinbackError> {
        let inner = self.inner.lock().await;
        let count = match status {
            Some(wanted) => inner.logs.iter().filter(|l| l.status == wanted).count(),
            None => inner.logs.len(),
        };
        Ok(count as i64)
    }

    async fn count_conversions(&self) -> Result<i64, WinbackError> {
        let inner = self.inner.lock().await;
        Ok(inner.conversions.len() as i64)
    }

    async fn sum_conversion_amounts(&self) -> Result<i64, WinbackError> {
        let inner = self.inner.lock().await;
        Ok(inner.conversions.iter().map(|c| c.amount).sum())
    }

    async fn send_history(
        &self,
        phone: &str,
        product: &str,
    ) -> Result<SendHistory, WinbackError> {
        let inner = self.inner.lock().await;
        // Join logs through their owning cart, matching the SQL backend.
        let cart_ids: Vec<i64> = inner
            .carts
            .iter()
            .filter(|c| c.customer_phone == phone && c.product_name == product)
            .map(|c| c.id)
            .collect();
        let matching: Vec<&NotificationLog> = inner
            .logs
            .iter()
            .filter(|l| l.abandoned_cart_id.is_some_and(|id| cart_ids.contains(&id)))
            .collect();
        let last_sent_at = matching
            .iter()
            .map(|l| l.sent_at.clone())
            .max();
        let sent_count = matching
            .iter()
            .filter(|l| l.status == DeliveryStatus::Sent)
            .count() as i64;
        Ok(SendHistory {
            last_sent_at,
            sent_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cart(phone: &str, product: &str, total: i64) -> NewCart {
        NewCart {
            customer_name: "박민수".to_string(),
            customer_phone: phone.to_string(),
            product_name: product.to_string(),
            total_amount: total,
            monthly_payment: total / 12,
            installment_months: 12,
        }
    }

    #[tokio::test]
    async fn create_cart_starts_pending_with_counter_ids() {
        let store = MemoryStore::new();

        let first = store
            .create_cart(&make_cart("010-1111-2222", "가방", 120_000))
            .await
            .unwrap();
        let second = store
            .create_cart(&make_cart("010-1111-2222", "신발", 90_000))
            .await
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let cart = store.get_cart(first).await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Pending);
        assert!(cart.notified_at.is_none());
        assert!(cart.purchased_at.is_none());
        assert!(!cart.added_at.is_empty());
    }

    #[tokio::test]
    async fn find_latest_cart_picks_highest_id() {
        let store = MemoryStore::new();
        store
            .create_cart(&make_cart("010-1111-2222", "가방", 100_000))
            .await
            .unwrap();
        let second = store
            .create_cart(&make_cart("010-1111-2222", "가방", 150_000))
            .await
            .unwrap();

        let latest = store
            .find_latest_cart("010-1111-2222", "가방")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second);

        assert!(store
            .find_latest_cart("010-9999-0000", "가방")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_status_sets_transition_timestamps() {
        let store = MemoryStore::new();
        let id = store
            .create_cart(&make_cart("010-1111-2222", "가방", 100_000))
            .await
            .unwrap();

        assert_eq!(
            store.update_cart_status(id, CartStatus::Notified).await.unwrap(),
            1
        );
        let cart = store.get_cart(id).await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Notified);
        assert!(cart.notified_at.is_some());

        store.update_cart_status(id, CartStatus::Converted).await.unwrap();
        let cart = store.get_cart(id).await.unwrap().unwrap();
        assert!(cart.purchased_at.is_some());
    }

    #[tokio::test]
    async fn update_on_nonexistent_id_affects_zero_rows() {
        let store = MemoryStore::new();
        assert_eq!(
            store.update_cart_status(42, CartStatus::Notified).await.unwrap(),
            0
        );
        assert_eq!(store.update_cart_amounts(42, 1, 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn aggregates_match_inserted_rows() {
        let store = MemoryStore::new();
        let a = store
            .create_cart(&make_cart("010-1111-2222", "가방", 120_000))
            .await
            .unwrap();
        store
            .create_cart(&make_cart("010-3333-4444", "신발", 90_000))
            .await
            .unwrap();
        store.update_cart_status(a, CartStatus::Notified).await.unwrap();

        store
            .append_log(&NewNotificationLog {
                abandoned_cart_id: Some(a),
                message_id: Some("mock_1".to_string()),
                phone: "010-1111-2222".to_string(),
                message: "test".to_string(),
                status: DeliveryStatus::Sent,
                error_message: None,
                sent_at: None,
            })
            .await
            .unwrap();
        store
            .append_conversion(&NewConversion {
                abandoned_cart_id: Some(a),
                order_id: None,
                payment_method: "janghaltuk".to_string(),
                amount: 120_000,
                installment_months: 12,
                converted_at: None,
            })
            .await
            .unwrap();

        assert_eq!(store.count_carts(None).await.unwrap(), 2);
        assert_eq!(
            store
                .count_carts(Some(&[CartStatus::Notified]))
                .await
                .unwrap(),
            1
        );
        assert_eq!(store.count_logs(Some(DeliveryStatus::Sent)).await.unwrap(), 1);
        assert_eq!(store.count_logs(Some(DeliveryStatus::Failed)).await.unwrap(), 0);
        assert_eq!(store.count_conversions().await.unwrap(), 1);
        assert_eq!(store.sum_conversion_amounts().await.unwrap(), 120_000);
    }

    #[tokio::test]
    async fn send_history_joins_through_owning_cart() {
        let store = MemoryStore::new();
        let a = store
            .create_cart(&make_cart("010-1111-2222", "가방", 120_000))
            .await
            .unwrap();

        store
            .append_log(&NewNotificationLog {
                abandoned_cart_id: Some(a),
                message_id: Some("mock_1".to_string()),
                phone: "010-1111-2222".to_string(),
                message: "test".to_string(),
                status: DeliveryStatus::Sent,
                error_message: None,
                sent_at: None,
            })
            .await
            .unwrap();
        store
            .append_log(&NewNotificationLog {
                abandoned_cart_id: Some(a),
                message_id: None,
                phone: "010-1111-2222".to_string(),
                message: "test".to_string(),
                status: DeliveryStatus::Failed,
                error_message: Some("down".to_string()),
                sent_at: None,
            })
            .await
            .unwrap();

        let history = store.send_history("010-1111-2222", "가방").await.unwrap();
        assert_eq!(history.sent_count, 1);
        assert!(history.last_sent_at.is_some());

        let none = store.send_history("010-1111-2222", "신발").await.unwrap();
        assert_eq!(none, SendHistory::default());
    }

    #[tokio::test]
    async fn import_cart_keeps_supplied_fields_but_assigns_id() {
        let store = MemoryStore::new();
        let id = store
            .import_cart(&CartRecord {
                id: 999,
                customer_name: "정수진".to_string(),
                customer_phone: "010-5555-6666".to_string(),
                product_name: "화장품".to_string(),
                total_amount: 60_000,
                monthly_payment: 5_000,
                installment_months: 12,
                added_at: "2026-08-01T00:00:00.000Z".to_string(),
                notified_at: Some("2026-08-01T01:00:00.000Z".to_string()),
                purchased_at: None,
                status: CartStatus::Notified,
            })
            .await
            .unwrap();

        assert_eq!(id, 1);
        let cart = store.get_cart(id).await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Notified);
        assert_eq!(cart.added_at, "2026-08-01T00:00:00.000Z");
    }
}
