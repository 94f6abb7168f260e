// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The abandonment lifecycle manager -- the only state machine in the system.
//!
//! Owns the cart transitions `pending -> notified -> converted` (plus the
//! terminal `pending -> expired`, driven by an external scheduler) and the
//! idempotent-notification policy keyed by (phone, product).

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use winback_core::types::{
    format_amount, monthly_payment, CartStatus, DeliveryStatus, NewCart, NewConversion,
    NewNotificationLog, NotificationRequest, DEFAULT_INSTALLMENT_MONTHS,
    PAYMENT_METHOD_INSTALLMENT,
};
use winback_core::{MessengerAdapter, RecordStore, WinbackError};

/// Where a notify request came from, selecting the stored log summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOrigin {
    /// Dashboard simulation / direct notify-one.
    Simulate,
    /// Bulk send over a storefront listing selection.
    Batch,
}

/// Input for one notify transition.
#[derive(Debug, Clone)]
pub struct NotifyInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub product_name: String,
    pub total_amount: i64,
    pub origin: NotifyOrigin,
}

/// Outcome of one notify transition.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// The messaging provider accepted the send; the cart is now `notified`.
    Sent {
        cart_id: i64,
        message_id: Option<String>,
    },
    /// An outstanding notification already exists for this (phone, product);
    /// the provider was not called.
    AlreadyNotified { cart_id: i64 },
    /// The latest record for this (phone, product) is in a terminal state;
    /// the provider was not called.
    Terminal { cart_id: i64, status: CartStatus },
    /// The provider rejected the send; a failed log row was written and the
    /// cart remains `pending`, eligible for a future retry.
    SendFailed { cart_id: i64, error: String },
}

/// Outcome of one convert transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutcome {
    pub conversion_id: i64,
    /// Whether a cart row was actually transitioned (false for an unknown
    /// cart id -- the conversion is still recorded).
    pub cart_updated: bool,
}

/// Owns cart state transitions and the idempotency guard.
pub struct LifecycleManager {
    store: Arc<dyn RecordStore>,
    messenger: Arc<dyn MessengerAdapter>,
    // Per-(phone, product) locks serializing the check-then-act sequence so
    // two concurrent notifies cannot both observe "not yet notified".
    notify_locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn RecordStore>, messenger: Arc<dyn MessengerAdapter>) -> Self {
        Self {
            store,
            messenger,
            notify_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    fn lock_for(&self, phone: &str, product: &str) -> Arc<Mutex<()>> {
        self.notify_locks
            .entry((phone.to_string(), product.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn validate(input: &NotifyInput) -> Result<(), WinbackError> {
        if input.customer_name.trim().is_empty() {
            return Err(WinbackError::Validation("customer_name is required".into()));
        }
        if input.customer_phone.trim().is_empty() {
            return Err(WinbackError::Validation("customer_phone is required".into()));
        }
        if input.product_name.trim().is_empty() {
            return Err(WinbackError::Validation("product_name is required".into()));
        }
        if input.total_amount <= 0 {
            return Err(WinbackError::Validation(
                "total_amount must be a positive amount".into(),
            ));
        }
        Ok(())
    }

    /// Run the notify transition for one cart.
    ///
    /// Resolves the target record by (phone, product), enforcing at most one
    /// outstanding notification per pair: an already-notified or terminal
    /// record short-circuits *before* the messaging provider is called. A
    /// missing record is materialized as `pending` first; a re-observed
    /// pending record gets its amount fields refreshed in place.
    pub async fn notify(&self, input: &NotifyInput) -> Result<NotifyOutcome, WinbackError> {
        Self::validate(input)?;

        let monthly = monthly_payment(input.total_amount, DEFAULT_INSTALLMENT_MONTHS);

        let lock = self.lock_for(&input.customer_phone, &input.product_name);
        let _guard = lock.lock().await;

        let existing = self
            .store
            .find_latest_cart(&input.customer_phone, &input.product_name)
            .await?;

        let cart_id = match existing {
            Some(cart) if cart.status == CartStatus::Notified => {
                debug!(cart_id = cart.id, "already notified, skipping send");
                return Ok(NotifyOutcome::AlreadyNotified { cart_id: cart.id });
            }
            Some(cart) if cart.status.is_terminal() => {
                debug!(cart_id = cart.id, status = %cart.status, "terminal record, skipping send");
                return Ok(NotifyOutcome::Terminal {
                    cart_id: cart.id,
                    status: cart.status,
                });
            }
            Some(cart) => {
                // Re-observed pending cart: refresh amounts instead of
                // duplicating the row.
                self.store
                    .update_cart_amounts(cart.id, input.total_amount, monthly)
                    .await?;
                cart.id
            }
            None => {
                self.store
                    .create_cart(&NewCart {
                        customer_name: input.customer_name.clone(),
                        customer_phone: input.customer_phone.clone(),
                        product_name: input.product_name.clone(),
                        total_amount: input.total_amount,
                        monthly_payment: monthly,
                        installment_months: DEFAULT_INSTALLMENT_MONTHS,
                    })
                    .await?
            }
        };

        let receipt = self
            .messenger
            .send_notification(&NotificationRequest {
                phone: input.customer_phone.clone(),
                customer_name: input.customer_name.clone(),
                product_name: input.product_name.clone(),
                total_amount: input.total_amount,
                monthly_payment: monthly,
                cart_id: Some(cart_id),
            })
            .await?;

        let summary = log_summary(input.origin, monthly);
        self.store
            .append_log(&NewNotificationLog {
                abandoned_cart_id: Some(cart_id),
                message_id: receipt.message_id.clone(),
                phone: input.customer_phone.clone(),
                message: summary,
                status: if receipt.success {
                    DeliveryStatus::Sent
                } else {
                    DeliveryStatus::Failed
                },
                error_message: receipt.error.clone(),
                sent_at: None,
            })
            .await?;

        if receipt.success {
            self.store
                .update_cart_status(cart_id, CartStatus::Notified)
                .await?;
            info!(cart_id, "notification sent, cart transitioned to notified");
            Ok(NotifyOutcome::Sent {
                cart_id,
                message_id: receipt.message_id,
            })
        } else {
            let error = receipt.error.unwrap_or_else(|| "send rejected".to_string());
            warn!(cart_id, %error, "notification rejected, cart stays pending");
            Ok(NotifyOutcome::SendFailed { cart_id, error })
        }
    }

    /// Record an out-of-band checkout completion.
    ///
    /// Appends a conversion record and unconditionally transitions the cart
    /// to `converted`, regardless of prior state -- a real revenue event is
    /// never dropped over a bookkeeping gap. An unknown cart id still
    /// records the conversion; `cart_updated` reports whether a row moved.
    pub async fn convert(
        &self,
        cart_id: i64,
        amount: i64,
        order_id: Option<String>,
        installment_months: Option<i64>,
    ) -> Result<ConvertOutcome, WinbackError> {
        if amount <= 0 {
            return Err(WinbackError::Validation(
                "amount must be a positive amount".into(),
            ));
        }

        let conversion_id = self
            .store
            .append_conversion(&NewConversion {
                abandoned_cart_id: Some(cart_id),
                order_id,
                payment_method: PAYMENT_METHOD_INSTALLMENT.to_string(),
                amount,
                installment_months: installment_months.unwrap_or(DEFAULT_INSTALLMENT_MONTHS),
                converted_at: None,
            })
            .await?;

        let changed = self
            .store
            .update_cart_status(cart_id, CartStatus::Converted)
            .await?;
        if changed == 0 {
            warn!(cart_id, "conversion recorded for unknown cart id");
        } else {
            info!(cart_id, conversion_id, "cart converted");
        }

        Ok(ConvertOutcome {
            conversion_id,
            cart_updated: changed > 0,
        })
    }
}

/// The summary line stored with the notification log, per request origin.
fn log_summary(origin: NotifyOrigin, monthly: i64) -> String {
    match origin {
        NotifyOrigin::Simulate => format!(
            "🎉 특별 혜택 알림 - 월 {}원으로 시작하는 특별 분할 결제 이벤트",
            format_amount(monthly)
        ),
        NotifyOrigin::Batch => format!(
            "[장바구니 안내] - 월 {}원 분할 결제 옵션 안내",
            format_amount(monthly)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winback_core::types::SendReceipt;
    use winback_test_utils::TestHarness;

    fn make_input(phone: &str, product: &str, total: i64) -> NotifyInput {
        NotifyInput {
            customer_name: "김철수".to_string(),
            customer_phone: phone.to_string(),
            product_name: product.to_string(),
            total_amount: total,
            origin: NotifyOrigin::Simulate,
        }
    }

    async fn setup() -> (TestHarness, LifecycleManager) {
        let harness = TestHarness::builder().build().await.unwrap();
        let lifecycle =
            LifecycleManager::new(harness.store.clone(), harness.messenger.clone());
        (harness, lifecycle)
    }

    #[tokio::test]
    async fn notify_creates_cart_and_transitions_to_notified() {
        let (harness, lifecycle) = setup().await;

        let outcome = lifecycle
            .notify(&make_input("010-0000-0000", "가방", 240_000))
            .await
            .unwrap();

        let NotifyOutcome::Sent { cart_id, message_id } = outcome else {
            panic!("expected Sent, got {outcome:?}");
        };
        assert!(message_id.is_some());

        let cart = harness.store.get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Notified);
        assert_eq!(cart.monthly_payment, 20_000);
        assert!(cart.notified_at.is_some());
        assert_eq!(
            harness.store.count_logs(Some(DeliveryStatus::Sent)).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn second_notify_for_same_pair_never_reaches_the_provider() {
        let (harness, lifecycle) = setup().await;
        let input = make_input("010-0000-0000", "가방", 240_000);

        let first = lifecycle.notify(&input).await.unwrap();
        let NotifyOutcome::Sent { cart_id, .. } = first else {
            panic!("expected Sent");
        };

        let second = lifecycle.notify(&input).await.unwrap();
        assert_eq!(second, NotifyOutcome::AlreadyNotified { cart_id });

        // Exactly one provider call, one sent log, one transition.
        assert_eq!(harness.messenger.sent_count().await, 1);
        assert_eq!(
            harness.store.count_logs(Some(DeliveryStatus::Sent)).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn failed_send_leaves_cart_pending_and_logs_failure() {
        let (harness, lifecycle) = setup().await;
        harness.messenger.script_failure("provider down").await;

        let outcome = lifecycle
            .notify(&make_input("010-0000-0000", "가방", 240_000))
            .await
            .unwrap();
        let NotifyOutcome::SendFailed { cart_id, error } = outcome else {
            panic!("expected SendFailed");
        };
        assert_eq!(error, "provider down");

        let cart = harness.store.get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Pending);
        assert!(cart.notified_at.is_none());
        assert_eq!(
            harness.store.count_logs(Some(DeliveryStatus::Failed)).await.unwrap(),
            1
        );

        // A later retry is allowed and succeeds.
        let retry = lifecycle
            .notify(&make_input("010-0000-0000", "가방", 240_000))
            .await
            .unwrap();
        assert!(matches!(retry, NotifyOutcome::Sent { .. }));
    }

    #[tokio::test]
    async fn renotify_of_pending_cart_refreshes_amounts_in_place() {
        let (harness, lifecycle) = setup().await;
        harness.messenger.script_failure("provider down").await;

        let first = lifecycle
            .notify(&make_input("010-0000-0000", "가방", 240_000))
            .await
            .unwrap();
        let NotifyOutcome::SendFailed { cart_id, .. } = first else {
            panic!("expected SendFailed");
        };

        // Re-observed with a different total: same row, new amounts.
        lifecycle
            .notify(&make_input("010-0000-0000", "가방", 360_000))
            .await
            .unwrap();

        assert_eq!(harness.store.count_carts(None).await.unwrap(), 1);
        let cart = harness.store.get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(cart.total_amount, 360_000);
        assert_eq!(cart.monthly_payment, 30_000);
    }

    #[tokio::test]
    async fn terminal_records_are_skipped_without_a_send() {
        let (harness, lifecycle) = setup().await;
        let input = make_input("010-0000-0000", "가방", 240_000);

        let NotifyOutcome::Sent { cart_id, .. } = lifecycle.notify(&input).await.unwrap()
        else {
            panic!("expected Sent");
        };
        lifecycle.convert(cart_id, 240_000, None, None).await.unwrap();

        let outcome = lifecycle.notify(&input).await.unwrap();
        assert_eq!(
            outcome,
            NotifyOutcome::Terminal {
                cart_id,
                status: CartStatus::Converted
            }
        );
        assert_eq!(harness.messenger.sent_count().await, 1);
    }

    #[tokio::test]
    async fn notify_rejects_invalid_input_before_any_write() {
        let (harness, lifecycle) = setup().await;

        let mut input = make_input("010-0000-0000", "가방", 240_000);
        input.total_amount = 0;
        assert!(matches!(
            lifecycle.notify(&input).await,
            Err(WinbackError::Validation(_))
        ));

        let mut input = make_input("010-0000-0000", "가방", 240_000);
        input.customer_phone = "  ".to_string();
        assert!(matches!(
            lifecycle.notify(&input).await,
            Err(WinbackError::Validation(_))
        ));

        assert_eq!(harness.store.count_carts(None).await.unwrap(), 0);
        assert_eq!(harness.messenger.sent_count().await, 0);
    }

    #[tokio::test]
    async fn convert_succeeds_from_pending() {
        let (harness, lifecycle) = setup().await;
        harness.messenger.script_failure("down").await;

        // Cart exists but was never successfully notified.
        let NotifyOutcome::SendFailed { cart_id, .. } = lifecycle
            .notify(&make_input("010-0000-0000", "가방", 100_000))
            .await
            .unwrap()
        else {
            panic!("expected SendFailed");
        };

        let outcome = lifecycle
            .convert(cart_id, 100_000, Some("ORDER_1".to_string()), None)
            .await
            .unwrap();
        assert!(outcome.cart_updated);

        let cart = harness.store.get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Converted);
        assert!(cart.purchased_at.is_some());
        assert_eq!(harness.store.count_conversions().await.unwrap(), 1);
        assert_eq!(harness.store.sum_conversion_amounts().await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn convert_on_unknown_cart_still_records_the_conversion() {
        let (harness, lifecycle) = setup().await;

        let outcome = lifecycle.convert(9_999, 50_000, None, Some(6)).await.unwrap();
        assert!(!outcome.cart_updated);
        assert_eq!(harness.store.count_conversions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn convert_rejects_non_positive_amount() {
        let (harness, lifecycle) = setup().await;
        assert!(matches!(
            lifecycle.convert(1, 0, None, None).await,
            Err(WinbackError::Validation(_))
        ));
        assert_eq!(harness.store.count_conversions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_notifies_for_one_pair_send_once() {
        let (harness, lifecycle) = setup().await;
        let lifecycle = Arc::new(lifecycle);
        let input = make_input("010-0000-0000", "가방", 240_000);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let lifecycle = lifecycle.clone();
            let input = input.clone();
            handles.push(tokio::spawn(async move { lifecycle.notify(&input).await }));
        }

        let mut sent = 0;
        for handle in handles {
            if matches!(handle.await.unwrap().unwrap(), NotifyOutcome::Sent { .. }) {
                sent += 1;
            }
        }
        assert_eq!(sent, 1);
        assert_eq!(harness.messenger.sent_count().await, 1);
        assert_eq!(harness.store.count_carts(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn log_summary_lines_carry_formatted_monthly_amount() {
        assert_eq!(
            log_summary(NotifyOrigin::Simulate, 20_000),
            "🎉 특별 혜택 알림 - 월 20,000원으로 시작하는 특별 분할 결제 이벤트"
        );
        assert_eq!(
            log_summary(NotifyOrigin::Batch, 20_000),
            "[장바구니 안내] - 월 20,000원 분할 결제 옵션 안내"
        );
    }

    #[tokio::test]
    async fn receipt_scripting_is_exercised_against_sqlite_too() {
        let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
        let lifecycle =
            LifecycleManager::new(harness.store.clone(), harness.messenger.clone());

        harness
            .messenger
            .script_receipt(SendReceipt::accepted("provider-id-1"))
            .await;
        let outcome = lifecycle
            .notify(&make_input("010-0000-0000", "가방", 240_000))
            .await
            .unwrap();
        let NotifyOutcome::Sent { message_id, .. } = outcome else {
            panic!("expected Sent");
        };
        assert_eq!(message_id.as_deref(), Some("provider-id-1"));
    }
}
