// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock storefront adapter serving a fixed cart listing.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use winback_core::types::{
    AdapterType, CartListing, HealthStatus, ListingFilter, ListingPage, ListingStatus,
    RestoreReceipt,
};
use winback_core::{ServiceAdapter, StorefrontAdapter, WinbackError};

/// Build a listing fixture aged by `hours_ago`.
pub fn listing(
    cart_no: &str,
    phone: &str,
    product: &str,
    total_amount: i64,
    status: ListingStatus,
    marketing_consent: bool,
    hours_ago: i64,
) -> CartListing {
    CartListing {
        cart_no: cart_no.to_string(),
        customer_name: "김철수".to_string(),
        customer_phone: phone.to_string(),
        marketing_consent,
        product_name: product.to_string(),
        total_amount,
        added_at: Utc::now() - Duration::hours(hours_ago),
        status,
        item_count: Some(1),
        customer_grade: None,
        purchase_history_count: None,
        last_purchase_date: None,
        preferred_category: None,
        average_order_amount: None,
    }
}

/// A storefront adapter backed by a fixed set of listings.
///
/// Filtering, newest-first sorting, and pagination behave like the real
/// adapter so dispatcher tests exercise identical listing semantics.
pub struct MockStorefront {
    listings: Vec<CartListing>,
}

impl MockStorefront {
    pub fn new(listings: Vec<CartListing>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ServiceAdapter for MockStorefront {
    fn name(&self) -> &str {
        "mock-storefront"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storefront
    }

    async fn health_check(&self) -> Result<HealthStatus, WinbackError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WinbackError> {
        Ok(())
    }
}

#[async_trait]
impl StorefrontAdapter for MockStorefront {
    async fn list_carts(&self, filter: &ListingFilter) -> Result<ListingPage, WinbackError> {
        let now = Utc::now();
        let mut matches: Vec<CartListing> = self
            .listings
            .iter()
            .filter(|cart| {
                filter.status.is_none_or(|s| cart.status == s)
                    && filter
                        .marketing_consent
                        .is_none_or(|c| cart.marketing_consent == c)
                    && filter.min_amount.is_none_or(|m| cart.total_amount >= m)
                    && filter
                        .hours_ago
                        .is_none_or(|h| cart.added_at <= now - Duration::hours(h))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        let total = matches.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(50);
        let items = matches.into_iter().skip(offset).take(limit).collect();

        Ok(ListingPage { items, total })
    }

    async fn restore_cart(&self, cart_id: i64) -> Result<RestoreReceipt, WinbackError> {
        Ok(RestoreReceipt {
            success: true,
            cart_no: Some(format!("CART_{cart_id}")),
            orderform_url: Some(format!(
                "https://mall.cafe24.com/orderform.html?cart_no=CART_{cart_id}"
            )),
            error: None,
        })
    }
}
