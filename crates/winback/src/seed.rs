// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `winback seed` command implementation.

use winback_campaign::seed_demo_data;
use winback_config::model::WinbackConfig;
use winback_core::{RecordStore, WinbackError};

/// Runs the `winback seed` command against the configured store.
pub async fn run_seed(config: WinbackConfig) -> Result<(), WinbackError> {
    let store = winback_storage::store_from_config(&config.storage)?;
    store.initialize().await?;

    let breakdown = seed_demo_data(&store).await?;
    store.close().await?;

    println!("seeded {} demo carts", breakdown.total_created);
    println!("  purchased: {}", breakdown.purchased);
    println!("  notified:  {}", breakdown.notified);
    println!("  pending:   {}", breakdown.pending);
    Ok(())
}
