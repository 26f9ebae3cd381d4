use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::database::connection::DatabaseError;
use crate::models::{NewOrder, PendingOrder};

use super::parse_decimal;

/// Pending order as stored in SQLite
///
/// SQLite has no decimal type, so quantities and prices are kept as their
/// canonical decimal text and parsed on the way out.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::database::schema::pending_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PendingOrderRow {
    pub id: i64,
    pub buyer_qty: String,
    pub buyer_price: String,
    pub seller_qty: String,
    pub seller_price: String,
    pub created_at: NaiveDateTime,
}

/// New pending order for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::database::schema::pending_orders)]
pub struct NewPendingOrderRow {
    pub buyer_qty: String,
    pub buyer_price: String,
    pub seller_qty: String,
    pub seller_price: String,
    pub created_at: NaiveDateTime,
}

impl NewPendingOrderRow {
    pub fn new(order: &NewOrder, created_at: NaiveDateTime) -> Self {
        Self {
            buyer_qty: encode_decimal(order.buyer_qty),
            buyer_price: encode_decimal(order.buyer_price),
            seller_qty: encode_decimal(order.seller_qty),
            seller_price: encode_decimal(order.seller_price),
            created_at,
        }
    }
}

impl TryFrom<PendingOrderRow> for PendingOrder {
    type Error = DatabaseError;

    fn try_from(row: PendingOrderRow) -> Result<Self, Self::Error> {
        Ok(PendingOrder {
            id: row.id,
            buyer_qty: parse_decimal("buyer_qty", &row.buyer_qty)?,
            buyer_price: parse_decimal("buyer_price", &row.buyer_price)?,
            seller_qty: parse_decimal("seller_qty", &row.seller_qty)?,
            seller_price: parse_decimal("seller_price", &row.seller_price)?,
            created_at: row.created_at.and_utc(),
        })
    }
}

/// Text form written to the decimal columns
pub fn encode_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}
