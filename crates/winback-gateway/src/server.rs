// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the dashboard API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use winback_campaign::{Dispatcher, LifecycleManager};
use winback_config::model::ServerConfig;
use winback_core::{MessengerAdapter, RecordStore, StorefrontAdapter, WinbackError};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn RecordStore>,
    pub messenger: Arc<dyn MessengerAdapter>,
    pub storefront: Arc<dyn StorefrontAdapter>,
    pub lifecycle: Arc<LifecycleManager>,
    pub dispatcher: Arc<Dispatcher>,
}

impl GatewayState {
    /// Wire the campaign layer over the given adapters.
    pub fn new(
        store: Arc<dyn RecordStore>,
        messenger: Arc<dyn MessengerAdapter>,
        storefront: Arc<dyn StorefrontAdapter>,
    ) -> Self {
        let lifecycle = Arc::new(LifecycleManager::new(store.clone(), messenger.clone()));
        let dispatcher = Arc::new(Dispatcher::new(storefront.clone(), lifecycle.clone()));
        Self {
            store,
            messenger,
            storefront,
            lifecycle,
            dispatcher,
        }
    }
}

/// Build the dashboard API router.
///
/// CORS is permissive: the dashboard frontend is served from a different
/// origin and the API carries no cookie-based auth.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/carts", get(handlers::get_carts))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/simulate", post(handlers::post_simulate))
        .route("/api/send-batch", post(handlers::post_send_batch))
        .route("/api/convert", post(handlers::post_convert))
        .route("/api/restore", post(handlers::post_restore))
        .route("/api/seed", post(handlers::post_seed))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), WinbackError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WinbackError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| WinbackError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
