// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the winback cart-abandonment service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the winback workspace: the abandoned-cart
//! lifecycle states, the record/log/conversion entities, and the adapter
//! seams for storage and the two external collaborators.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WinbackError;
pub use types::{
    AdapterType, CartListing, CartRecord, CartStatus, DashboardStats, DeliveryStatus,
    HealthStatus, ListingFilter, ListingPage, ListingStatus, NotificationLog,
    NotificationRequest, RestoreReceipt, SendReceipt,
};

// Re-export all adapter traits at crate root.
pub use traits::{MessengerAdapter, RecordStore, ServiceAdapter, StorefrontAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winback_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = WinbackError::Config("test".into());
        let _validation = WinbackError::Validation("test".into());
        let _storage = WinbackError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _storefront = WinbackError::Storefront {
            message: "test".into(),
            source: None,
        };
        let _messaging = WinbackError::Messaging {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _internal = WinbackError::Internal("test".into());
    }

    #[test]
    fn validation_error_message_is_descriptive() {
        let err = WinbackError::Validation("total_amount must be positive".into());
        assert_eq!(
            err.to_string(),
            "validation error: total_amount must be positive"
        );
    }

    #[test]
    fn adapter_type_has_three_variants() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Store,
            AdapterType::Messenger,
            AdapterType::Storefront,
        ];

        // Verify Display and FromStr round-trip for all variants.
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies the adapter traits compile and are reachable through the
        // public API. If a trait is missing, this test won't compile.
        fn _assert_service_adapter<T: ServiceAdapter>() {}
        fn _assert_record_store<T: RecordStore>() {}
        fn _assert_messenger<T: MessengerAdapter>() {}
        fn _assert_storefront<T: StorefrontAdapter>() {}
    }
}
