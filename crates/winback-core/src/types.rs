// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the winback service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of installment months applied when a request does not override it.
pub const DEFAULT_INSTALLMENT_MONTHS: i64 = 12;

/// Payment method tag written on every conversion record.
///
/// Identifies the installment product conversions are attributed to.
pub const PAYMENT_METHOD_INSTALLMENT: &str = "janghaltuk";

/// Lifecycle state of an observed abandoned cart.
///
/// Legal transitions: `pending -> notified -> converted`, and
/// `pending -> expired`. `converted` and `expired` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    Pending,
    Notified,
    Converted,
    Expired,
}

impl CartStatus {
    /// Terminal states are immutable except for append-only child records.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CartStatus::Converted | CartStatus::Expired)
    }
}

/// Cart status as classified by the upstream storefront listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Purchased,
    Expired,
}

/// Delivery state of an outbound notification, as reported by the provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Failed,
}

/// An observed abandoned-cart record, owned by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub product_name: String,
    /// Whole currency units, always positive.
    pub total_amount: i64,
    /// Derived: `floor(total_amount / installment_months)`.
    pub monthly_payment: i64,
    pub installment_months: i64,
    pub added_at: String,
    pub notified_at: Option<String>,
    pub purchased_at: Option<String>,
    pub status: CartStatus,
}

/// Fields for creating a new cart record. Status starts at `pending`.
#[derive(Debug, Clone)]
pub struct NewCart {
    pub customer_name: String,
    pub customer_phone: String,
    pub product_name: String,
    pub total_amount: i64,
    pub monthly_payment: i64,
    pub installment_months: i64,
}

/// Append-only log of one notification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLog {
    pub id: i64,
    /// Owning cart, when known at send time.
    pub abandoned_cart_id: Option<i64>,
    /// Provider-assigned message id, present on accepted sends.
    pub message_id: Option<String>,
    pub phone: String,
    pub message: String,
    pub sent_at: String,
    pub status: DeliveryStatus,
    /// Populated iff `status == failed`.
    pub error_message: Option<String>,
}

/// Fields for appending a notification log row.
#[derive(Debug, Clone)]
pub struct NewNotificationLog {
    pub abandoned_cart_id: Option<i64>,
    pub message_id: Option<String>,
    pub phone: String,
    pub message: String,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    /// Explicit sent timestamp for imported rows; `None` means now.
    pub sent_at: Option<String>,
}

/// Append-only record of one completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: i64,
    pub abandoned_cart_id: Option<i64>,
    pub order_id: Option<String>,
    pub payment_method: String,
    pub amount: i64,
    pub installment_months: i64,
    pub converted_at: String,
}

/// Fields for appending a conversion record.
#[derive(Debug, Clone)]
pub struct NewConversion {
    pub abandoned_cart_id: Option<i64>,
    pub order_id: Option<String>,
    pub payment_method: String,
    pub amount: i64,
    pub installment_months: i64,
    /// Explicit conversion timestamp for imported rows; `None` means now.
    pub converted_at: Option<String>,
}

/// Send history for one (phone, product) pair, derived from the log table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendHistory {
    /// Timestamp of the most recent log row, if any.
    pub last_sent_at: Option<String>,
    /// Count of log rows with status `sent`.
    pub sent_count: i64,
}

/// One cart as reported by the upstream storefront listing.
///
/// Read-only input: the service never mutates listings. A [`CartRecord`]
/// is materialized from a listing only once a notification or conversion
/// actually happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartListing {
    pub cart_no: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub marketing_consent: bool,
    pub product_name: String,
    pub total_amount: i64,
    pub added_at: DateTime<Utc>,
    pub status: ListingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_history_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_order_amount: Option<i64>,
}

impl CartListing {
    /// Whether this cart may receive a notification.
    ///
    /// The single eligibility predicate used for both UI selection and the
    /// server-side re-check in bulk send: the cart must still be pending
    /// upstream and its owner must have opted into marketing messages.
    pub fn is_eligible(&self) -> bool {
        self.status == ListingStatus::Pending && self.marketing_consent
    }
}

/// Filter for storefront cart listings. All predicates are optional and
/// conjunctive; an absent predicate matches everything on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Exact listing-status match.
    pub status: Option<ListingStatus>,
    /// Exact consent-flag match.
    pub marketing_consent: Option<bool>,
    /// Keep carts with `total_amount >= min_amount`.
    pub min_amount: Option<i64>,
    /// Keep carts added at or before `now - hours_ago` -- an "at least this
    /// old" cutoff. Carts newer than the cutoff are excluded.
    pub hours_ago: Option<i64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of a filtered cart listing.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub items: Vec<CartListing>,
    /// Match count after filtering, before pagination.
    pub total: usize,
}

/// Variables handed to the messaging collaborator for one notification.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub phone: String,
    pub customer_name: String,
    pub product_name: String,
    pub total_amount: i64,
    pub monthly_payment: i64,
    /// Owning cart record, used to build the payment link.
    pub cart_id: Option<i64>,
}

/// Outcome of one send attempt as reported by the messaging provider.
///
/// A provider-reported failure is a normal value here, never an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl SendReceipt {
    /// Receipt for an accepted send.
    pub fn accepted(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    /// Receipt for a send the provider rejected.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a storefront cart-restore call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreReceipt {
    pub success: bool,
    pub cart_no: Option<String>,
    pub orderform_url: Option<String>,
    pub error: Option<String>,
}

/// Dashboard KPI rollup. Percentages are 0-100; a zero denominator yields 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_carts: i64,
    pub abandoned_carts: i64,
    pub abandonment_rate: f64,
    pub alimtalk_sent: i64,
    pub conversions: i64,
    pub conversion_rate: f64,
    pub final_abandonment_rate: f64,
    pub additional_revenue: i64,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`ServiceAdapter`].
///
/// [`ServiceAdapter`]: crate::traits::ServiceAdapter
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Messenger,
    Storefront,
}

/// Monthly payment for a total split into equal installments.
///
/// Integer division floors, matching the display-price contract:
/// `monthly * months <= total < monthly * months + months`.
pub fn monthly_payment(total_amount: i64, installment_months: i64) -> i64 {
    if installment_months <= 0 {
        return 0;
    }
    total_amount / installment_months
}

/// Format a whole-unit amount with thousands separators, e.g. `240000`
/// becomes `"240,000"`. Message templates display amounts this way.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    let first_group = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Current UTC time in the canonical storage shape (`%Y-%m-%dT%H:%M:%fZ`,
/// millisecond precision), matching what SQLite `strftime` writes.
pub fn now_utc() -> String {
    format_timestamp(Utc::now())
}

/// Format a timestamp in the canonical storage shape.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn cart_status_round_trips_through_display() {
        for status in [
            CartStatus::Pending,
            CartStatus::Notified,
            CartStatus::Converted,
            CartStatus::Expired,
        ] {
            let s = status.to_string();
            assert_eq!(CartStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(CartStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn terminal_states_are_converted_and_expired() {
        assert!(!CartStatus::Pending.is_terminal());
        assert!(!CartStatus::Notified.is_terminal());
        assert!(CartStatus::Converted.is_terminal());
        assert!(CartStatus::Expired.is_terminal());
    }

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&CartStatus::Notified).unwrap(),
            "\"notified\""
        );
        assert_eq!(
            serde_json::to_string(&ListingStatus::Purchased).unwrap(),
            "\"purchased\""
        );
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn monthly_payment_floors() {
        assert_eq!(monthly_payment(240_000, 12), 20_000);
        assert_eq!(monthly_payment(100_000, 12), 8_333);
        assert_eq!(monthly_payment(11, 12), 0);
        assert_eq!(monthly_payment(50_000, 0), 0);
    }

    proptest! {
        #[test]
        fn monthly_payment_bounds_hold(total in 1i64..10_000_000) {
            let monthly = monthly_payment(total, DEFAULT_INSTALLMENT_MONTHS);
            prop_assert!(monthly * 12 <= total);
            prop_assert!(total < monthly * 12 + 12);
        }
    }

    fn listing(status: ListingStatus, consent: bool) -> CartListing {
        CartListing {
            cart_no: "CART_1000".to_string(),
            customer_name: "김철수".to_string(),
            customer_phone: "010-1234-5678".to_string(),
            marketing_consent: consent,
            product_name: "가방".to_string(),
            total_amount: 120_000,
            added_at: Utc::now(),
            status,
            item_count: Some(1),
            customer_grade: None,
            purchase_history_count: None,
            last_purchase_date: None,
            preferred_category: None,
            average_order_amount: None,
        }
    }

    #[test]
    fn eligibility_requires_pending_and_consent() {
        assert!(listing(ListingStatus::Pending, true).is_eligible());
        assert!(!listing(ListingStatus::Pending, false).is_eligible());
        assert!(!listing(ListingStatus::Purchased, true).is_eligible());
        assert!(!listing(ListingStatus::Expired, true).is_eligible());
    }

    #[test]
    fn send_receipt_constructors() {
        let ok = SendReceipt::accepted("msg-1");
        assert!(ok.success);
        assert_eq!(ok.message_id.as_deref(), Some("msg-1"));
        assert!(ok.error.is_none());

        let bad = SendReceipt::rejected("quota exceeded");
        assert!(!bad.success);
        assert!(bad.message_id.is_none());
        assert_eq!(bad.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1,000");
        assert_eq!(format_amount(20_000), "20,000");
        assert_eq!(format_amount(240_000), "240,000");
        assert_eq!(format_amount(1_234_567), "1,234,567");
    }

    #[test]
    fn timestamp_matches_sqlite_strftime_shape() {
        let ts = now_utc();
        // e.g. 2026-08-23T10:15:42.123Z
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
    }
}
