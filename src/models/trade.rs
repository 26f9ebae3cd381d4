use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An executed match between the buy side of one row and the sell side of another.
///
/// Trades are append-only: once written to the ledger they are never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Trade {
    pub id: i64,
    #[schema(value_type = f64, example = 90.0)]
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[schema(value_type = f64, example = 5.0)]
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    pub buyer_order_id: i64,
    pub seller_order_id: i64,
    pub executed_at: DateTime<Utc>,
}

/// A trade produced by a matching run, before the ledger assigns its id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTrade {
    pub price: Decimal,
    pub qty: Decimal,
    pub buyer_order_id: i64,
    pub seller_order_id: i64,
}

impl NewTrade {
    pub fn into_trade(self, id: i64, executed_at: DateTime<Utc>) -> Trade {
        Trade {
            id,
            price: self.price,
            qty: self.qty,
            buyer_order_id: self.buyer_order_id,
            seller_order_id: self.seller_order_id,
            executed_at,
        }
    }
}
