// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the winback dashboard.
//!
//! Exposes the cart listing, KPI stats, notification, conversion, restore,
//! and seeding operations over a small JSON API. All domain behavior lives
//! in `winback-campaign`; handlers only translate between HTTP and the
//! campaign layer.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState};
