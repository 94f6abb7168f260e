// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign logic: the abandonment lifecycle state machine, the bulk
//! notification dispatcher, KPI aggregation, and the demo seeder.
//!
//! Everything here is adapter-agnostic: it talks to storage, messaging,
//! and the storefront only through the `winback-core` traits.

pub mod dispatcher;
pub mod lifecycle;
pub mod seeder;
pub mod stats;

pub use dispatcher::{BatchSummary, Dispatcher};
pub use lifecycle::{ConvertOutcome, LifecycleManager, NotifyInput, NotifyOrigin, NotifyOutcome};
pub use seeder::{seed_demo_data, SeedBreakdown};
pub use stats::collect_stats;
