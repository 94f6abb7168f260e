// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cafe24 storefront adapter.
//!
//! Runs in mock mode until a mall id and access token are configured: the
//! cart listing is served from a generated catalog and restores are
//! simulated. The Admin API client slots in behind the same trait once
//! real credentials exist.

pub mod catalog;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use winback_config::model::StorefrontConfig;
use winback_core::types::{
    AdapterType, HealthStatus, ListingFilter, ListingPage, RestoreReceipt,
};
use winback_core::{ServiceAdapter, StorefrontAdapter, WinbackError};

/// Optional hints appended to an order-form URL.
#[derive(Debug, Clone, Default)]
pub struct OrderformOptions {
    pub payment_method: Option<String>,
    pub installment_months: Option<i64>,
}

/// Build a Cafe24 order-form URL for a restored cart, with optional
/// payment-method and installment hints.
pub fn orderform_url(mall_id: &str, cart_no: &str, options: &OrderformOptions) -> String {
    let mut url = format!("https://{mall_id}.cafe24.com/orderform.html?cart_no={cart_no}");
    if let Some(method) = &options.payment_method {
        url.push_str("&payment_method=");
        url.push_str(method);
    }
    if let Some(months) = options.installment_months {
        url.push_str(&format!("&installment_months={months}"));
    }
    url
}

/// Storefront adapter for the Cafe24 platform.
pub struct Cafe24Storefront {
    config: StorefrontConfig,
}

impl Cafe24Storefront {
    pub fn new(config: StorefrontConfig) -> Self {
        Self { config }
    }

    fn is_configured(&self) -> bool {
        self.config.mall_id.is_some() && self.config.access_token.is_some()
    }
}

#[async_trait]
impl ServiceAdapter for Cafe24Storefront {
    fn name(&self) -> &str {
        "cafe24"
    }

    fn version(&self) -> semver::Version {
        semver::Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or(semver::Version::new(0, 0, 0))
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
impl StorefrontAdapter for Cafe24Storefront {
    async fn list_carts(&self, filter: &ListingFilter) -> Result<ListingPage, WinbackError> {
        if self.is_configured() {
            // Admin API client pending real credentials.
            warn!("cafe24 admin api listing not yet implemented, returning empty page");
            return Ok(ListingPage {
                items: Vec::new(),
                total: 0,
            });
        }

        debug!(size = self.config.catalog_size, "serving generated mock catalog");
        Ok(catalog::page(
            catalog::generate(self.config.catalog_size),
            filter,
        ))
    }

    async fn restore_cart(&self, cart_id: i64) -> Result<RestoreReceipt, WinbackError> {
        let mall_id = self.config.mall_id.as_deref().unwrap_or("mall");
        if !self.is_configured() {
            debug!(cart_id, "mock mode: simulating cart restore");
        }

        let cart_no = if self.is_configured() {
            format!("CART_{cart_id}")
        } else {
            format!("CART_{cart_id}_{}", Utc::now().timestamp_millis())
        };

        Ok(RestoreReceipt {
            success: true,
            cart_no: Some(cart_no),
            orderform_url: Some(orderform_url(
                mall_id,
                &format!("CART_{cart_id}"),
                &OrderformOptions::default(),
            )),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winback_core::types::ListingStatus;

    fn mock_adapter() -> Cafe24Storefront {
        Cafe24Storefront::new(StorefrontConfig::default())
    }

    #[test]
    fn orderform_url_carries_optional_hints() {
        assert_eq!(
            orderform_url("demo", "CART_42", &OrderformOptions::default()),
            "https://demo.cafe24.com/orderform.html?cart_no=CART_42"
        );
        assert_eq!(
            orderform_url(
                "demo",
                "CART_42",
                &OrderformOptions {
                    payment_method: Some("janghaltuk".to_string()),
                    installment_months: Some(12),
                }
            ),
            "https://demo.cafe24.com/orderform.html?cart_no=CART_42&payment_method=janghaltuk&installment_months=12"
        );
    }

    #[tokio::test]
    async fn mock_listing_respects_filters_and_pagination() {
        let adapter = mock_adapter();
        let page = adapter
            .list_carts(&ListingFilter {
                status: Some(ListingStatus::Pending),
                offset: Some(40),
                limit: Some(50),
                ..ListingFilter::default()
            })
            .await
            .unwrap();
        // 80-cart catalog: 48 pending, 8 left after the offset.
        assert_eq!(page.total, 48);
        assert_eq!(page.items.len(), 8);
        assert!(page.items.iter().all(|c| c.status == ListingStatus::Pending));
    }

    #[tokio::test]
    async fn mock_listing_defaults_to_fifty_per_page() {
        let adapter = mock_adapter();
        let page = adapter.list_carts(&ListingFilter::default()).await.unwrap();
        assert_eq!(page.total, 80);
        assert_eq!(page.items.len(), 50);
    }

    #[tokio::test]
    async fn mock_restore_returns_timestamped_cart_no() {
        let adapter = mock_adapter();
        let receipt = adapter.restore_cart(7).await.unwrap();
        assert!(receipt.success);
        assert!(receipt.cart_no.unwrap().starts_with("CART_7_"));
        assert_eq!(
            receipt.orderform_url.as_deref(),
            Some("https://mall.cafe24.com/orderform.html?cart_no=CART_7")
        );
    }

    #[tokio::test]
    async fn configured_adapter_uses_the_mall_id() {
        let adapter = Cafe24Storefront::new(StorefrontConfig {
            mall_id: Some("demo".to_string()),
            access_token: Some("token".to_string()),
            catalog_size: 80,
        });

        let receipt = adapter.restore_cart(7).await.unwrap();
        assert_eq!(receipt.cart_no.as_deref(), Some("CART_7"));
        assert_eq!(
            receipt.orderform_url.as_deref(),
            Some("https://demo.cafe24.com/orderform.html?cart_no=CART_7")
        );

        // Admin API listing is stubbed out.
        let page = adapter.list_carts(&ListingFilter::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn adapter_identifies_itself() {
        let adapter = mock_adapter();
        assert_eq!(adapter.name(), "cafe24");
        assert_eq!(adapter.adapter_type(), AdapterType::Storefront);
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
