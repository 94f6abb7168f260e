// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity models persisted by the record store.
//!
//! The types live in `winback-core` so every crate shares one definition;
//! this module re-exports them for query-module ergonomics.

pub use winback_core::types::{
    CartRecord, CartStatus, ConversionRecord, DeliveryStatus, NewCart, NewConversion,
    NewNotificationLog, NotificationLog, SendHistory,
};
