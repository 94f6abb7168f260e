// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard KPI aggregation. Pure functions of store state, recomputed on
//! every read; nothing is cached or persisted.

use std::sync::Arc;

use winback_core::types::{CartStatus, DashboardStats, DeliveryStatus};
use winback_core::{RecordStore, WinbackError};

fn rate(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// Compute the dashboard KPI rollup from current store state.
///
/// Percentages are 0-100; a zero denominator yields 0, never NaN.
pub async fn collect_stats(store: &Arc<dyn RecordStore>) -> Result<DashboardStats, WinbackError> {
    let total_carts = store.count_carts(None).await?;
    let abandoned_carts = store
        .count_carts(Some(&[CartStatus::Pending, CartStatus::Notified]))
        .await?;
    let alimtalk_sent = store.count_logs(Some(DeliveryStatus::Sent)).await?;
    let conversions = store.count_conversions().await?;
    let additional_revenue = store.sum_conversion_amounts().await?;

    Ok(DashboardStats {
        total_carts,
        abandoned_carts,
        abandonment_rate: rate(abandoned_carts, total_carts),
        alimtalk_sent,
        conversions,
        conversion_rate: rate(conversions, alimtalk_sent),
        final_abandonment_rate: rate(total_carts - conversions, total_carts),
        additional_revenue,
    })
}
