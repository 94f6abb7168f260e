// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for winback integration tests.
//!
//! Provides mock collaborator adapters with injectable outcomes and
//! captured calls, plus a harness that wires a real record store (temp
//! SQLite or in-memory) together with the mocks.

pub mod harness;
pub mod mock_messenger;
pub mod mock_storefront;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_messenger::MockMessenger;
pub use mock_storefront::{listing, MockStorefront};
