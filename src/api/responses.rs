use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::{BookState, MatchReport};
use crate::models::{NewOrder, PendingOrder, Trade};

/// Request to submit a new order
///
/// Fill in one side; the other side may be omitted and defaults to zero.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[schema(value_type = f64, example = 10.0)]
    pub buyer_qty: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 100.0)]
    pub buyer_price: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 0.0)]
    pub seller_qty: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 0.0)]
    pub seller_price: Decimal,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            buyer_qty: request.buyer_qty,
            buyer_price: request.buyer_price,
            seller_qty: request.seller_qty,
            seller_price: request.seller_price,
        }
    }
}

/// Response after submitting an order
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order_id: i64,
    /// Trades executed by the matching run that followed the submission
    pub trades: Vec<Trade>,
}

/// Current pending orders and trade ledger
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub pending_orders: Vec<PendingOrder>,
    pub completed_orders: Vec<Trade>,
}

impl From<BookState> for OrdersResponse {
    fn from(state: BookState) -> Self {
        Self {
            pending_orders: state.pending_orders,
            completed_orders: state.completed_orders,
        }
    }
}

/// State after a matching run, plus the trades that run executed
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchOrdersResponse {
    pub pending_orders: Vec<PendingOrder>,
    pub completed_orders: Vec<Trade>,
    pub executed: Vec<Trade>,
}

impl From<MatchReport> for MatchOrdersResponse {
    fn from(report: MatchReport) -> Self {
        Self {
            pending_orders: report.pending_orders,
            completed_orders: report.completed_orders,
            executed: report.executed,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
