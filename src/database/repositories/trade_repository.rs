use chrono::Utc;
use diesel::prelude::*;

use crate::database::connection::{DatabaseError, SqliteTransaction};
use crate::database::models::{CompletedOrderRow, NewCompletedOrderRow};
use crate::database::schema::completed_orders;
use crate::models::{NewTrade, Trade};

/// Trade ledger - append-only history of executed matches
pub trait TradeLedger {
    /// Append a trade and return its id
    fn append(&mut self, trade: &NewTrade) -> Result<i64, DatabaseError>;

    /// Every trade ever recorded, ascending by id
    fn list_all_trades(&mut self) -> Result<Vec<Trade>, DatabaseError>;
}

impl TradeLedger for SqliteTransaction<'_> {
    fn append(&mut self, trade: &NewTrade) -> Result<i64, DatabaseError> {
        let row = NewCompletedOrderRow::new(trade, Utc::now().naive_utc());

        diesel::insert_into(completed_orders::table)
            .values(&row)
            .returning(completed_orders::id)
            .get_result::<i64>(&mut *self.conn)
            .map_err(DatabaseError::from)
    }

    fn list_all_trades(&mut self) -> Result<Vec<Trade>, DatabaseError> {
        completed_orders::table
            .order(completed_orders::id.asc())
            .select(CompletedOrderRow::as_select())
            .load(&mut *self.conn)?
            .into_iter()
            .map(Trade::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::establish_connection_pool;
    use crate::database::transaction::Database;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_append_and_list() {
        let db = establish_connection_pool(":memory:", 1, Duration::from_secs(5)).unwrap();

        let trades = db
            .transaction(|tx| {
                tx.append(&NewTrade {
                    price: dec!(90),
                    qty: dec!(5),
                    buyer_order_id: 1,
                    seller_order_id: 3,
                })?;
                tx.append(&NewTrade {
                    price: dec!(91.25),
                    qty: dec!(0.5),
                    buyer_order_id: 2,
                    seller_order_id: 4,
                })?;
                tx.list_all_trades()
            })
            .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, 1);
        assert_eq!(trades[0].price, dec!(90));
        assert_eq!(trades[0].qty, dec!(5));
        assert_eq!(trades[1].id, 2);
        assert_eq!(trades[1].price, dec!(91.25));
        assert_eq!(trades[1].buyer_order_id, 2);
        assert_eq!(trades[1].seller_order_id, 4);
    }
}
