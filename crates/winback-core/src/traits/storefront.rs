// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storefront adapter trait for the e-commerce platform integration.

use async_trait::async_trait;

use crate::error::WinbackError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{ListingFilter, ListingPage, RestoreReceipt};

/// Adapter for the upstream storefront platform.
///
/// Supplies the read-only cart listing the dispatcher filters, and the
/// cart-restore call used by the payment-redirect flow.
#[async_trait]
pub trait StorefrontAdapter: ServiceAdapter {
    /// Lists carts matching the filter, sorted newest-first and paginated.
    ///
    /// `ListingPage::total` is the match count after filtering, before
    /// pagination; an offset past the end yields an empty page with the
    /// correct total.
    async fn list_carts(&self, filter: &ListingFilter) -> Result<ListingPage, WinbackError>;

    /// Restores an abandoned cart on the storefront so the customer can
    /// resume checkout.
    async fn restore_cart(&self, cart_id: i64) -> Result<RestoreReceipt, WinbackError>;
}
