// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kakao Alimtalk messenger adapter.
//!
//! Without the full credential set (rest api key, sender key, template
//! code) the adapter runs in mock mode: sends are logged and reported as
//! accepted with a synthetic message id. With credentials it POSTs the
//! Kakao business-message endpoint; a provider rejection resolves to a
//! failed receipt, not an error.

pub mod template;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use winback_config::model::MessagingConfig;
use winback_core::types::{AdapterType, HealthStatus, NotificationRequest, SendReceipt};
use winback_core::{MessengerAdapter, ServiceAdapter, WinbackError};

use crate::template::{notification_text, payment_link};

/// Messenger adapter for Kakao Alimtalk.
pub struct KakaoMessenger {
    config: MessagingConfig,
    /// Dashboard base URL the payment deep link points at.
    app_url: String,
    client: reqwest::Client,
}

impl KakaoMessenger {
    pub fn new(config: MessagingConfig, app_url: impl Into<String>) -> Self {
        Self {
            config,
            app_url: app_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn mock_send(&self, request: &NotificationRequest) -> SendReceipt {
        info!(
            phone = %request.phone,
            customer = %request.customer_name,
            product = %request.product_name,
            monthly = request.monthly_payment,
            "mock mode: simulating alimtalk send"
        );
        SendReceipt::accepted(format!("mock_{}", Utc::now().timestamp_millis()))
    }

    async fn real_send(&self, request: &NotificationRequest) -> Result<SendReceipt, WinbackError> {
        // Credentials checked by the caller.
        let rest_api_key = self.config.rest_api_key.as_deref().unwrap_or_default();
        let template_code = self.config.template_code.as_deref().unwrap_or_default();
        let link = payment_link(&self.app_url, request.cart_id);

        let body = json!({
            "receiver_phone_number": request.phone,
            "template_code": template_code,
            "message": {
                "object_type": "text",
                "text": notification_text(request),
                "link": {
                    "web_url": link,
                    "mobile_web_url": link,
                },
            },
            "variables": {
                "customer_name": request.customer_name,
                "product_name": request.product_name,
                "total_amount": winback_core::types::format_amount(request.total_amount),
                "monthly_payment": winback_core::types::format_amount(request.monthly_payment),
            },
        });

        let response = self
            .client
            .post(format!("{}/v1/alimtalk/messages", self.config.base_url))
            .header("Authorization", format!("KakaoAK {rest_api_key}"))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, "alimtalk request failed to reach the provider");
                return Ok(SendReceipt::rejected(err.to_string()));
            }
        };

        let status = response.status();
        let payload: serde_json::Value = response.json().await.unwrap_or_default();
        if !status.is_success() {
            let error = payload
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("provider returned {status}"));
            warn!(%status, %error, "alimtalk send rejected");
            return Ok(SendReceipt::rejected(error));
        }

        let message_id = payload
            .get("message_id")
            .and_then(|m| m.as_str())
            .map(str::to_string);
        Ok(SendReceipt {
            success: true,
            message_id,
            error: None,
        })
    }
}

#[async_trait]
impl ServiceAdapter for KakaoMessenger {
    fn name(&self) -> &str {
        "kakao"
    }

    fn version(&self) -> semver::Version {
        semver::Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or(semver::Version::new(0, 0, 0))
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messenger
    }

    async fn health_check(&self) -> Result<HealthStatus, WinbackError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WinbackError> {
        Ok(())
    }
}

#[async_trait]
impl MessengerAdapter for KakaoMessenger {
    async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<SendReceipt, WinbackError> {
        if !self.config.has_credentials() {
            return Ok(self.mock_send(request));
        }
        self.real_send(request).await
    }
}
