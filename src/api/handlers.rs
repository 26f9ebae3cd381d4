use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::engine::{EngineError, MatchingService};
use crate::models::NewOrder;

use super::openapi::ApiDoc;
use super::responses::*;

/// Shared application state
pub type AppState = Arc<dyn MatchingService>;

/// Convert EngineError to HTTP response
///
/// Storage failures are reported without detail; the cause is logged.
impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_validation_error() {
            (StatusCode::BAD_REQUEST, self.to_string())
        } else {
            tracing::error!("Request failed: {}", self);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Order matching failed; no changes were applied".to_string(),
            )
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Run a blocking engine call off the async runtime
async fn run_blocking<T, F>(engine: &AppState, f: F) -> Result<T, EngineError>
where
    F: FnOnce(&dyn MatchingService) -> Result<T, EngineError> + Send + 'static,
    T: Send + 'static,
{
    let engine = Arc::clone(engine);
    tokio::task::spawn_blocking(move || f(engine.as_ref()))
        .await
        .map_err(|e| EngineError::Worker(e.to_string()))?
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// Submit an order, then match everything that crosses
#[utoipa::path(
    post,
    path = "/create-order",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Matching failed", body = ErrorResponse)
    )
)]
pub async fn create_order(
    State(engine): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), EngineError> {
    let order = NewOrder::from(request);
    let (order_id, report) =
        run_blocking(&engine, move |engine| engine.submit_and_match(order)).await?;

    let response = CreateOrderResponse {
        message: "Order created successfully".to_string(),
        order_id,
        trades: report.executed,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Match everything that currently crosses
#[utoipa::path(
    post,
    path = "/match-orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Matching run committed", body = MatchOrdersResponse),
        (status = 500, description = "Matching failed and was rolled back", body = ErrorResponse)
    )
)]
pub async fn match_orders(
    State(engine): State<AppState>,
) -> Result<Json<MatchOrdersResponse>, EngineError> {
    let report = run_blocking(&engine, |engine| engine.run_matching()).await?;
    Ok(Json(report.into()))
}

/// Get pending orders and the trade ledger
#[utoipa::path(
    get,
    path = "/get-orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Current state", body = OrdersResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_orders(State(engine): State<AppState>) -> Result<Json<OrdersResponse>, EngineError> {
    let state = run_blocking(&engine, |engine| engine.read_state()).await?;
    Ok(Json(state.into()))
}

/// OpenAPI document
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
