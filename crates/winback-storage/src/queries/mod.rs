// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over the shared [`Database`] handle.
//!
//! [`Database`]: crate::database::Database

pub mod carts;
pub mod conversions;
pub mod logs;
