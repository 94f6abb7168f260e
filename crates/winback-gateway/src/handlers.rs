// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the dashboard REST API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use winback_campaign::{collect_stats, seed_demo_data, NotifyInput, NotifyOrigin, NotifyOutcome};
use winback_core::types::{
    CartListing, HealthStatus, ListingFilter, ListingStatus, RestoreReceipt,
};
use winback_core::{RecordStore, ServiceAdapter, StorefrontAdapter, WinbackError};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Validation errors map to 400; everything else is a 500.
fn map_error(err: WinbackError) -> ApiError {
    match err {
        WinbackError::Validation(message) => api_error(StatusCode::BAD_REQUEST, message),
        err => {
            error!(%err, "request failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Health of one registered adapter.
#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub adapter_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// "ok" when every adapter reports healthy.
    pub status: String,
    pub version: String,
    pub adapters: Vec<AdapterHealth>,
}

async fn adapter_health<A: ServiceAdapter + ?Sized>(adapter: &A) -> AdapterHealth {
    let (status, detail) = match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => ("healthy".to_string(), None),
        Ok(HealthStatus::Degraded(detail)) => ("degraded".to_string(), Some(detail)),
        Ok(HealthStatus::Unhealthy(detail)) => ("unhealthy".to_string(), Some(detail)),
        Err(err) => ("unhealthy".to_string(), Some(err.to_string())),
    };
    AdapterHealth {
        name: adapter.name().to_string(),
        adapter_type: adapter.adapter_type().to_string(),
        status,
        detail,
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let adapters = vec![
        adapter_health(state.store.as_ref()).await,
        adapter_health(state.messenger.as_ref()).await,
        adapter_health(state.storefront.as_ref()).await,
    ];
    let status = if adapters.iter().all(|a| a.status == "healthy") {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthReport {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        adapters,
    })
}

/// Query parameters for GET /api/carts.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub marketing_consent: Option<bool>,
    #[serde(default)]
    pub min_amount: Option<i64>,
    #[serde(default)]
    pub hours_ago: Option<i64>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// One listing item augmented with send history and eligibility.
#[derive(Debug, Serialize)]
pub struct EnrichedCart {
    #[serde(flatten)]
    pub listing: CartListing,
    /// Latest notification log timestamp for this (phone, product).
    pub sent_at: Option<String>,
    /// "sent" once any log row exists.
    pub notified_status: Option<String>,
    /// Count of log rows with status `sent`.
    pub sent_count: i64,
    /// Server-computed eligibility, so the frontend never reimplements it.
    pub eligible: bool,
}

/// Response body for GET /api/carts.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub carts: Vec<EnrichedCart>,
    /// Match count after filtering, before pagination.
    pub total: usize,
}

/// GET /api/carts
pub async fn get_carts(
    State(state): State<GatewayState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingResponse>, ApiError> {
    let page = state
        .storefront
        .list_carts(&ListingFilter {
            status: query.status,
            marketing_consent: query.marketing_consent,
            min_amount: query.min_amount,
            hours_ago: query.hours_ago,
            limit: query.limit,
            offset: query.offset,
        })
        .await
        .map_err(map_error)?;

    let mut carts = Vec::with_capacity(page.items.len());
    for listing in page.items {
        let history = state
            .store
            .send_history(&listing.customer_phone, &listing.product_name)
            .await
            .map_err(map_error)?;
        let eligible = listing.is_eligible();
        carts.push(EnrichedCart {
            notified_status: history.last_sent_at.as_ref().map(|_| "sent".to_string()),
            sent_at: history.last_sent_at,
            sent_count: history.sent_count,
            eligible,
            listing,
        });
    }

    Ok(Json(ListingResponse {
        carts,
        total: page.total,
    }))
}

/// GET /api/stats
pub async fn get_stats(
    State(state): State<GatewayState>,
) -> Result<Json<winback_core::types::DashboardStats>, ApiError> {
    let stats = collect_stats(&state.store).await.map_err(map_error)?;
    Ok(Json(stats))
}

/// Request body for POST /api/simulate. Fields default so missing values
/// surface as 400 validation errors, not deserialization rejections.
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub total_amount: i64,
}

/// Response body for POST /api/simulate.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub message: String,
}

/// POST /api/simulate
pub async fn post_simulate(
    State(state): State<GatewayState>,
    Json(body): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let outcome = state
        .lifecycle
        .notify(&NotifyInput {
            customer_name: body.customer_name,
            customer_phone: body.customer_phone,
            product_name: body.product_name,
            total_amount: body.total_amount,
            origin: NotifyOrigin::Simulate,
        })
        .await
        .map_err(map_error)?;

    let response = match outcome {
        NotifyOutcome::Sent {
            cart_id,
            message_id,
        } => SimulateResponse {
            success: true,
            cart_id: Some(cart_id),
            message_id,
            message: "알림톡이 성공적으로 발송되었습니다.".to_string(),
        },
        NotifyOutcome::AlreadyNotified { cart_id } => SimulateResponse {
            success: false,
            cart_id: Some(cart_id),
            message_id: None,
            message: "이미 알림톡이 발송된 장바구니입니다.".to_string(),
        },
        NotifyOutcome::Terminal { cart_id, status } => SimulateResponse {
            success: false,
            cart_id: Some(cart_id),
            message_id: None,
            message: format!("이미 {status} 상태인 장바구니입니다."),
        },
        NotifyOutcome::SendFailed { cart_id, error } => SimulateResponse {
            success: false,
            cart_id: Some(cart_id),
            message_id: None,
            message: format!("알림톡 발송에 실패했습니다: {error}"),
        },
    };
    Ok(Json(response))
}

/// Request body for POST /api/send-batch.
#[derive(Debug, Deserialize)]
pub struct SendBatchRequest {
    #[serde(default)]
    pub cart_nos: Vec<String>,
}

/// Response body for POST /api/send-batch.
#[derive(Debug, Serialize)]
pub struct SendBatchResponse {
    pub success: bool,
    pub success_count: usize,
    pub failed_count: usize,
    pub total_count: usize,
    pub message: String,
}

/// POST /api/send-batch
pub async fn post_send_batch(
    State(state): State<GatewayState>,
    Json(body): Json<SendBatchRequest>,
) -> Result<Json<SendBatchResponse>, ApiError> {
    if body.cart_nos.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "장바구니 번호가 필요합니다.",
        ));
    }

    let summary = state
        .dispatcher
        .bulk_notify(&body.cart_nos)
        .await
        .map_err(map_error)?
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                "선택한 장바구니를 찾을 수 없습니다.",
            )
        })?;

    Ok(Json(SendBatchResponse {
        success: true,
        message: format!(
            "{}건 발송 완료, {}건 실패",
            summary.success_count, summary.failed_count
        ),
        success_count: summary.success_count,
        failed_count: summary.failed_count,
        total_count: summary.total_count,
    }))
}

/// Request body for POST /api/convert.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub cart_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub installment_months: Option<i64>,
}

/// Response body for POST /api/convert.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub conversion_id: i64,
    pub cart_updated: bool,
    pub message: String,
}

/// POST /api/convert
pub async fn post_convert(
    State(state): State<GatewayState>,
    Json(body): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let (Some(cart_id), Some(amount)) = (body.cart_id, body.amount) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "cart_id and amount are required",
        ));
    };

    let outcome = state
        .lifecycle
        .convert(cart_id, amount, body.order_id, body.installment_months)
        .await
        .map_err(map_error)?;

    Ok(Json(ConvertResponse {
        success: true,
        conversion_id: outcome.conversion_id,
        cart_updated: outcome.cart_updated,
        message: "전환이 성공적으로 기록되었습니다.".to_string(),
    }))
}

/// Request body for POST /api/restore.
#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    #[serde(default)]
    pub cart_id: Option<i64>,
}

/// POST /api/restore
pub async fn post_restore(
    State(state): State<GatewayState>,
    Json(body): Json<RestoreRequest>,
) -> Result<Json<RestoreReceipt>, ApiError> {
    let Some(cart_id) = body.cart_id else {
        return Err(api_error(StatusCode::BAD_REQUEST, "cart_id is required"));
    };

    let receipt = state
        .storefront
        .restore_cart(cart_id)
        .await
        .map_err(map_error)?;
    Ok(Json(receipt))
}

/// Response body for POST /api/seed.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    pub total_created: usize,
    pub breakdown: winback_campaign::SeedBreakdown,
}

/// POST /api/seed
pub async fn post_seed(
    State(state): State<GatewayState>,
) -> Result<Json<SeedResponse>, ApiError> {
    let breakdown = seed_demo_data(&state.store).await.map_err(map_error)?;
    Ok(Json(SeedResponse {
        success: true,
        message: "초기 데이터가 생성되었습니다.".to_string(),
        total_created: breakdown.total_created,
        breakdown,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use winback_test_utils::{listing, TestHarness};

    async fn state_with(listings: Vec<CartListing>) -> (TestHarness, GatewayState) {
        let harness = TestHarness::builder()
            .with_listings(listings)
            .build()
            .await
            .unwrap();
        let state = GatewayState::new(
            harness.store.clone(),
            harness.messenger.clone(),
            harness.storefront.clone(),
        );
        (harness, state)
    }

    fn simulate_body(phone: &str, product: &str, total: i64) -> SimulateRequest {
        SimulateRequest {
            customer_name: "김철수".to_string(),
            customer_phone: phone.to_string(),
            product_name: product.to_string(),
            total_amount: total,
        }
    }

    #[tokio::test]
    async fn health_reports_every_adapter() {
        let (_harness, state) = state_with(vec![]).await;
        let Json(report) = get_health(State(state)).await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.adapters.len(), 3);
        let names: Vec<&str> = report.adapters.iter().map(|a| a.name.as_str()).collect();
        assert!(names.contains(&"memory"));
        assert!(names.contains(&"mock-messenger"));
        assert!(names.contains(&"mock-storefront"));
    }

    #[tokio::test]
    async fn carts_are_enriched_with_send_history_and_eligibility() {
        let (_harness, state) = state_with(vec![
            listing("CART_1000", "010-1111-1111", "가방", 120_000, ListingStatus::Pending, true, 30),
            listing("CART_1001", "010-2222-2222", "신발", 90_000, ListingStatus::Pending, false, 30),
        ])
        .await;

        // Notify the first cart so it has history.
        let Json(sim) = post_simulate(
            State(state.clone()),
            Json(simulate_body("010-1111-1111", "가방", 120_000)),
        )
        .await
        .unwrap();
        assert!(sim.success);

        let Json(response) = get_carts(State(state), Query(ListingQuery::default()))
            .await
            .unwrap();
        assert_eq!(response.total, 2);

        let notified = response
            .carts
            .iter()
            .find(|c| c.listing.cart_no == "CART_1000")
            .unwrap();
        assert_eq!(notified.sent_count, 1);
        assert_eq!(notified.notified_status.as_deref(), Some("sent"));
        assert!(notified.sent_at.is_some());
        assert!(notified.eligible);

        let no_consent = response
            .carts
            .iter()
            .find(|c| c.listing.cart_no == "CART_1001")
            .unwrap();
        assert_eq!(no_consent.sent_count, 0);
        assert!(no_consent.notified_status.is_none());
        assert!(!no_consent.eligible);
    }

    #[tokio::test]
    async fn simulate_validation_failure_is_a_400() {
        let (_harness, state) = state_with(vec![]).await;
        let err = post_simulate(
            State(state),
            Json(simulate_body("010-1111-1111", "가방", 0)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_simulate_reports_non_success() {
        let (harness, state) = state_with(vec![]).await;
        let body = || simulate_body("010-1111-1111", "가방", 120_000);

        let Json(first) = post_simulate(State(state.clone()), Json(body())).await.unwrap();
        assert!(first.success);
        assert!(first.message_id.is_some());

        let Json(second) = post_simulate(State(state), Json(body())).await.unwrap();
        assert!(!second.success);
        assert_eq!(second.cart_id, first.cart_id);
        assert_eq!(harness.messenger.sent_count().await, 1);
    }

    #[tokio::test]
    async fn send_batch_rejects_empty_selection() {
        let (_harness, state) = state_with(vec![]).await;
        let err = post_send_batch(
            State(state),
            Json(SendBatchRequest { cart_nos: vec![] }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn send_batch_unknown_identifiers_is_a_404() {
        let (_harness, state) = state_with(vec![listing(
            "CART_1000",
            "010-1111-1111",
            "가방",
            120_000,
            ListingStatus::Pending,
            true,
            30,
        )])
        .await;

        let err = post_send_batch(
            State(state),
            Json(SendBatchRequest {
                cart_nos: vec!["CART_9999".to_string()],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn send_batch_reports_counts() {
        let (_harness, state) = state_with(vec![
            listing("CART_1000", "010-1111-1111", "가방", 120_000, ListingStatus::Pending, true, 30),
            listing("CART_1001", "010-2222-2222", "신발", 90_000, ListingStatus::Pending, false, 30),
        ])
        .await;

        let Json(response) = post_send_batch(
            State(state),
            Json(SendBatchRequest {
                cart_nos: vec!["CART_1000".to_string(), "CART_1001".to_string()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.success_count, 1);
        assert_eq!(response.failed_count, 1);
        assert_eq!(response.total_count, 2);
        assert_eq!(response.message, "1건 발송 완료, 1건 실패");
    }

    #[tokio::test]
    async fn convert_requires_cart_id_and_amount() {
        let (_harness, state) = state_with(vec![]).await;
        let err = post_convert(
            State(state),
            Json(ConvertRequest {
                cart_id: Some(1),
                amount: None,
                order_id: None,
                installment_months: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn convert_records_and_reports_cart_update() {
        let (_harness, state) = state_with(vec![]).await;
        let Json(sim) = post_simulate(
            State(state.clone()),
            Json(simulate_body("010-1111-1111", "가방", 120_000)),
        )
        .await
        .unwrap();

        let Json(response) = post_convert(
            State(state),
            Json(ConvertRequest {
                cart_id: sim.cart_id,
                amount: Some(120_000),
                order_id: Some("ORDER_1".to_string()),
                installment_months: None,
            }),
        )
        .await
        .unwrap();
        assert!(response.success);
        assert!(response.cart_updated);
    }

    #[tokio::test]
    async fn restore_returns_the_storefront_receipt() {
        let (_harness, state) = state_with(vec![]).await;
        let Json(receipt) = post_restore(
            State(state),
            Json(RestoreRequest { cart_id: Some(7) }),
        )
        .await
        .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.cart_no.as_deref(), Some("CART_7"));
    }

    #[tokio::test]
    async fn seed_then_stats_reflects_the_demo_data() {
        let (_harness, state) = state_with(vec![]).await;

        let Json(seeded) = post_seed(State(state.clone())).await.unwrap();
        assert!(seeded.success);
        assert_eq!(seeded.total_created, 100);
        assert_eq!(seeded.breakdown.purchased, 30);

        let Json(stats) = get_stats(State(state)).await.unwrap();
        assert_eq!(stats.total_carts, 100);
        assert_eq!(stats.abandoned_carts, 70);
        assert_eq!(stats.alimtalk_sent, 50);
        assert_eq!(stats.conversions, 30);
        assert_eq!(stats.abandonment_rate, 70.0);
        assert_eq!(stats.final_abandonment_rate, 70.0);
    }
}
