// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `winback serve` command implementation.
//!
//! Opens the configured record store, wires the storefront and messenger
//! adapters, and serves the gateway until interrupted.

use std::sync::Arc;

use tracing::{info, warn};

use winback_cafe24::Cafe24Storefront;
use winback_config::model::WinbackConfig;
use winback_core::{
    MessengerAdapter, RecordStore, ServiceAdapter, StorefrontAdapter, WinbackError,
};
use winback_gateway::GatewayState;
use winback_kakao::KakaoMessenger;

/// Runs the `winback serve` command.
pub async fn run_serve(config: WinbackConfig) -> Result<(), WinbackError> {
    init_tracing(&config.service.log_level);

    info!(backend = %config.storage.backend, "starting winback serve");

    let store = winback_storage::store_from_config(&config.storage)?;
    store.initialize().await?;

    let messenger: Arc<dyn MessengerAdapter> = Arc::new(KakaoMessenger::new(
        config.messaging.clone(),
        config.server.app_url.clone(),
    ));
    if !config.messaging.has_credentials() {
        info!("kakao credentials not configured, messenger runs in mock mode");
    }

    let storefront: Arc<dyn StorefrontAdapter> =
        Arc::new(Cafe24Storefront::new(config.storefront.clone()));

    let state = GatewayState::new(store.clone(), messenger.clone(), storefront.clone());

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    };

    winback_gateway::start_server(&config.server, state, shutdown).await?;

    // Drain adapters in reverse wiring order; the store checkpoints last.
    if let Err(err) = storefront.shutdown().await {
        warn!(%err, "storefront shutdown failed");
    }
    if let Err(err) = messenger.shutdown().await {
        warn!(%err, "messenger shutdown failed");
    }
    store.close().await?;

    info!("winback stopped");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("winback={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
