// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the winback plugin seams.
//!
//! All adapters extend the [`ServiceAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod messenger;
pub mod store;
pub mod storefront;

// Re-export all traits at the traits module level for convenience.
pub use adapter::ServiceAdapter;
pub use messenger::MessengerAdapter;
pub use store::RecordStore;
pub use storefront::StorefrontAdapter;
