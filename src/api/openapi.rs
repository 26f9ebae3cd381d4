use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::responses::*;
use crate::models::{PendingOrder, Trade};

/// OpenAPI specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Double Auction API",
        version = "1.0.0",
        description = "FIFO double-auction order matching over a transactional SQLite store",
        license(
            name = "MIT"
        )
    ),
    paths(
        handlers::health_check,
        handlers::create_order,
        handlers::match_orders,
        handlers::get_orders,
    ),
    components(
        schemas(
            PendingOrder,
            Trade,
            CreateOrderRequest,
            CreateOrderResponse,
            OrdersResponse,
            MatchOrdersResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Orders", description = "Order submission, matching and state"),
    )
)]
pub struct ApiDoc;
