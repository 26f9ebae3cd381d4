use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::database::connection::DatabaseError;
use crate::models::{NewTrade, Trade};

use super::{encode_decimal, parse_decimal};

/// Completed order (trade ledger entry) as stored in SQLite
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::database::schema::completed_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompletedOrderRow {
    pub id: i64,
    pub price: String,
    pub qty: String,
    pub buyer_order_id: i64,
    pub seller_order_id: i64,
    pub executed_at: NaiveDateTime,
}

/// New ledger entry for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::database::schema::completed_orders)]
pub struct NewCompletedOrderRow {
    pub price: String,
    pub qty: String,
    pub buyer_order_id: i64,
    pub seller_order_id: i64,
    pub executed_at: NaiveDateTime,
}

impl NewCompletedOrderRow {
    pub fn new(trade: &NewTrade, executed_at: NaiveDateTime) -> Self {
        Self {
            price: encode_decimal(trade.price),
            qty: encode_decimal(trade.qty),
            buyer_order_id: trade.buyer_order_id,
            seller_order_id: trade.seller_order_id,
            executed_at,
        }
    }
}

impl TryFrom<CompletedOrderRow> for Trade {
    type Error = DatabaseError;

    fn try_from(row: CompletedOrderRow) -> Result<Self, Self::Error> {
        Ok(Trade {
            id: row.id,
            price: parse_decimal("price", &row.price)?,
            qty: parse_decimal("qty", &row.qty)?,
            buyer_order_id: row.buyer_order_id,
            seller_order_id: row.seller_order_id,
            executed_at: row.executed_at.and_utc(),
        })
    }
}
