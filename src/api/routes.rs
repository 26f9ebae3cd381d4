use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::*;

/// Create the API router
pub fn create_router(engine: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        // Order endpoints
        .route("/create-order", post(create_order))
        .route("/match-orders", post(match_orders))
        .route("/get-orders", get(get_orders))
        .with_state(engine)
}
