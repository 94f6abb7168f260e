// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger adapter trait for the outbound notification provider.

use async_trait::async_trait;

use crate::error::WinbackError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{NotificationRequest, SendReceipt};

/// Adapter for the templated-notification messaging provider.
///
/// A send the provider rejects resolves to `Ok(SendReceipt { success:
/// false, .. })`; `Err` is reserved for transport-level faults the caller
/// cannot attribute to the recipient.
#[async_trait]
pub trait MessengerAdapter: ServiceAdapter {
    /// Sends one installment-incentive notification.
    async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<SendReceipt, WinbackError>;
}
