// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messenger adapter for deterministic testing.
//!
//! `MockMessenger` implements `MessengerAdapter`, capturing every send
//! request for assertion and resolving each call against a scripted queue
//! of receipts (falling back to success once the queue is empty).

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use winback_core::types::{AdapterType, HealthStatus, NotificationRequest, SendReceipt};
use winback_core::{MessengerAdapter, ServiceAdapter, WinbackError};

/// A mock messaging provider for testing.
///
/// Captures every [`NotificationRequest`] passed to `send_notification`
/// and returns scripted receipts in order. When no receipt is scripted,
/// the send is reported as accepted with a sequential `mock_test_{n}` id.
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
    scripted: Arc<Mutex<VecDeque<SendReceipt>>>,
}

impl MockMessenger {
    /// Create a new mock messenger that accepts every send.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a receipt to be returned by the next unscripted send.
    pub async fn script_receipt(&self, receipt: SendReceipt) {
        self.scripted.lock().await.push_back(receipt);
    }

    /// Queue a rejection for the next send.
    pub async fn script_failure(&self, error: &str) {
        self.script_receipt(SendReceipt::rejected(error)).await;
    }

    /// All requests passed to `send_notification`, in call order.
    pub async fn sent_requests(&self) -> Vec<NotificationRequest> {
        self.sent.lock().await.clone()
    }

    /// Count of send attempts the mock has seen.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockMessenger {
    fn name(&self) -> &str {
        "mock-messenger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
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
impl MessengerAdapter for MockMessenger {
    async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<SendReceipt, WinbackError> {
        let mut sent = self.sent.lock().await;
        sent.push(request.clone());
        let n = sent.len();
        drop(sent);

        if let Some(receipt) = self.scripted.lock().await.pop_front() {
            return Ok(receipt);
        }
        Ok(SendReceipt::accepted(format!("mock_test_{n}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(phone: &str) -> NotificationRequest {
        NotificationRequest {
            phone: phone.to_string(),
            customer_name: "김철수".to_string(),
            product_name: "가방".to_string(),
            total_amount: 240_000,
            monthly_payment: 20_000,
            cart_id: Some(1),
        }
    }

    #[tokio::test]
    async fn unscripted_sends_are_accepted_with_sequential_ids() {
        let messenger = MockMessenger::new();

        let first = messenger
            .send_notification(&make_request("010-1111-2222"))
            .await
            .unwrap();
        let second = messenger
            .send_notification(&make_request("010-3333-4444"))
            .await
            .unwrap();

        assert!(first.success);
        assert_eq!(first.message_id.as_deref(), Some("mock_test_1"));
        assert_eq!(second.message_id.as_deref(), Some("mock_test_2"));
        assert_eq!(messenger.sent_count().await, 2);
    }

    #[tokio::test]
    async fn scripted_receipts_are_consumed_in_order() {
        let messenger = MockMessenger::new();
        messenger.script_failure("quota exceeded").await;

        let first = messenger
            .send_notification(&make_request("010-1111-2222"))
            .await
            .unwrap();
        assert!(!first.success);
        assert_eq!(first.error.as_deref(), Some("quota exceeded"));

        // Queue drained: back to accepting.
        let second = messenger
            .send_notification(&make_request("010-1111-2222"))
            .await
            .unwrap();
        assert!(second.success);
    }

    #[tokio::test]
    async fn requests_are_captured_for_assertion() {
        let messenger = MockMessenger::new();
        messenger
            .send_notification(&make_request("010-1111-2222"))
            .await
            .unwrap();

        let sent = messenger.sent_requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone, "010-1111-2222");
        assert_eq!(sent[0].monthly_payment, 20_000);
    }
}
