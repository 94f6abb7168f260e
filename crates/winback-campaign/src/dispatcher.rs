// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bulk notification dispatcher over a storefront listing selection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use winback_core::types::{CartListing, ListingFilter};
use winback_core::{StorefrontAdapter, WinbackError};

use crate::lifecycle::{LifecycleManager, NotifyInput, NotifyOrigin, NotifyOutcome};

// Upper bound on the listing snapshot taken to resolve a batch selection.
const RESOLVE_LIMIT: usize = 1000;

/// Per-batch counters returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Notifications the provider accepted.
    pub success_count: usize,
    /// Ineligible, unresolved, rejected, or errored items.
    pub failed_count: usize,
    /// Size of the requested selection.
    pub total_count: usize,
}

/// Sends notifications for a caller-selected set of storefront cart ids.
///
/// Re-checks eligibility server-side for every item; the client's selection
/// is a hint, not an authorization.
pub struct Dispatcher {
    storefront: Arc<dyn StorefrontAdapter>,
    lifecycle: Arc<LifecycleManager>,
}

impl Dispatcher {
    pub fn new(storefront: Arc<dyn StorefrontAdapter>, lifecycle: Arc<LifecycleManager>) -> Self {
        Self {
            storefront,
            lifecycle,
        }
    }

    /// Notify every cart in `cart_nos` that is still eligible.
    ///
    /// Returns `None` when none of the identifiers resolve against the
    /// storefront listing. One item failing never aborts the rest: provider
    /// rejections, ineligible carts, and per-item errors all land in
    /// `failed_count` and the batch continues. Idempotency skips (already
    /// notified, terminal) count as neither success nor failure.
    pub async fn bulk_notify(
        &self,
        cart_nos: &[String],
    ) -> Result<Option<BatchSummary>, WinbackError> {
        let page = self
            .storefront
            .list_carts(&ListingFilter {
                limit: Some(RESOLVE_LIMIT),
                ..ListingFilter::default()
            })
            .await?;
        let by_cart_no: HashMap<&str, &CartListing> = page
            .items
            .iter()
            .map(|cart| (cart.cart_no.as_str(), cart))
            .collect();

        let mut resolved_any = false;
        let mut summary = BatchSummary {
            total_count: cart_nos.len(),
            ..BatchSummary::default()
        };

        for cart_no in cart_nos {
            let Some(cart) = by_cart_no.get(cart_no.as_str()) else {
                warn!(%cart_no, "cart not found in storefront listing");
                summary.failed_count += 1;
                continue;
            };
            resolved_any = true;

            if !cart.is_eligible() {
                warn!(%cart_no, status = %cart.status, consent = cart.marketing_consent,
                    "cart not eligible for notification");
                summary.failed_count += 1;
                continue;
            }

            let input = NotifyInput {
                customer_name: cart.customer_name.clone(),
                customer_phone: cart.customer_phone.clone(),
                product_name: cart.product_name.clone(),
                total_amount: cart.total_amount,
                origin: NotifyOrigin::Batch,
            };
            match self.lifecycle.notify(&input).await {
                Ok(NotifyOutcome::Sent { .. }) => summary.success_count += 1,
                Ok(NotifyOutcome::SendFailed { .. }) => summary.failed_count += 1,
                // Idempotency skips are not failures.
                Ok(NotifyOutcome::AlreadyNotified { .. } | NotifyOutcome::Terminal { .. }) => {}
                Err(err) => {
                    warn!(%cart_no, %err, "notify failed, continuing batch");
                    summary.failed_count += 1;
                }
            }
        }

        if !resolved_any {
            return Ok(None);
        }

        info!(
            success = summary.success_count,
            failed = summary.failed_count,
            total = summary.total_count,
            "batch send complete"
        );
        Ok(Some(summary))
    }
}
