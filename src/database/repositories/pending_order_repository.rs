use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::database::connection::{DatabaseError, SqliteTransaction};
use crate::database::models::{encode_decimal, NewPendingOrderRow, PendingOrderRow};
use crate::database::schema::pending_orders;
use crate::models::{NewOrder, PendingOrder};

/// Pending order store - resting buy/sell interest
///
/// Only the matching engine mutates existing rows; submissions only insert.
pub trait PendingOrderStore {
    /// Insert a new order and return its id
    ///
    /// Ids grow monotonically and are never reused, so insertion order is
    /// priority order.
    fn insert(&mut self, order: &NewOrder) -> Result<i64, DatabaseError>;

    /// Rows with `buyer_qty > 0 OR seller_qty > 0`, ascending by id
    fn list_active(&mut self) -> Result<Vec<PendingOrder>, DatabaseError>;

    /// Take `buyer_delta` and `seller_delta` off a row, clamping each side at zero
    fn apply_delta(
        &mut self,
        id: i64,
        buyer_delta: Decimal,
        seller_delta: Decimal,
    ) -> Result<(), DatabaseError>;

    /// Delete every row with `buyer_qty <= 0 AND seller_qty <= 0`
    /// Returns the number of rows removed
    fn delete_where_exhausted(&mut self) -> Result<usize, DatabaseError>;

    /// All rows, ascending by id
    fn list_all_orders(&mut self) -> Result<Vec<PendingOrder>, DatabaseError>;
}

impl SqliteTransaction<'_> {
    fn load_orders(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        pending_orders::table
            .order(pending_orders::id.asc())
            .select(PendingOrderRow::as_select())
            .load(&mut *self.conn)?
            .into_iter()
            .map(PendingOrder::try_from)
            .collect()
    }
}

impl PendingOrderStore for SqliteTransaction<'_> {
    fn insert(&mut self, order: &NewOrder) -> Result<i64, DatabaseError> {
        let row = NewPendingOrderRow::new(order, Utc::now().naive_utc());

        diesel::insert_into(pending_orders::table)
            .values(&row)
            .returning(pending_orders::id)
            .get_result::<i64>(&mut *self.conn)
            .map_err(DatabaseError::from)
    }

    fn list_active(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        // Decimal text does not compare numerically in SQL, so filter here
        let mut orders = self.load_orders()?;
        orders.retain(PendingOrder::is_active);
        Ok(orders)
    }

    fn apply_delta(
        &mut self,
        id: i64,
        buyer_delta: Decimal,
        seller_delta: Decimal,
    ) -> Result<(), DatabaseError> {
        let row = pending_orders::table
            .find(id)
            .select(PendingOrderRow::as_select())
            .first(&mut *self.conn)
            .optional()?
            .ok_or(DatabaseError::RowNotFound(id))?;

        let (buyer_qty, seller_qty) =
            PendingOrder::try_from(row)?.decremented(buyer_delta, seller_delta);

        diesel::update(pending_orders::table.find(id))
            .set((
                pending_orders::buyer_qty.eq(encode_decimal(buyer_qty)),
                pending_orders::seller_qty.eq(encode_decimal(seller_qty)),
            ))
            .execute(&mut *self.conn)?;

        Ok(())
    }

    fn delete_where_exhausted(&mut self) -> Result<usize, DatabaseError> {
        let exhausted: Vec<i64> = self
            .load_orders()?
            .into_iter()
            .filter(PendingOrder::is_exhausted)
            .map(|order| order.id)
            .collect();

        if exhausted.is_empty() {
            return Ok(0);
        }

        let deleted = diesel::delete(pending_orders::table.filter(pending_orders::id.eq_any(exhausted)))
            .execute(&mut *self.conn)?;

        Ok(deleted)
    }

    fn list_all_orders(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        self.load_orders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::establish_connection_pool;
    use crate::database::transaction::Database;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn database() -> crate::database::SqliteDatabase {
        establish_connection_pool(":memory:", 1, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let db = database();
        let ids = db
            .transaction(|tx| {
                Ok(vec![
                    tx.insert(&NewOrder::buy(dec!(1), dec!(10)))?,
                    tx.insert(&NewOrder::sell(dec!(1), dec!(9)))?,
                    tx.insert(&NewOrder::buy(dec!(2), dec!(11)))?,
                ])
            })
            .unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let db = database();
        db.transaction(|tx| {
            let id = tx.insert(&NewOrder::buy(dec!(1), dec!(10)))?;
            tx.apply_delta(id, dec!(1), dec!(0))?;
            tx.delete_where_exhausted()
        })
        .unwrap();

        let next = db
            .transaction(|tx| tx.insert(&NewOrder::buy(dec!(1), dec!(10))))
            .unwrap();
        assert_eq!(next, 2);
    }

    #[test]
    fn test_list_active_skips_exhausted_rows() {
        let db = database();
        let active = db
            .transaction(|tx| {
                tx.insert(&NewOrder::buy(dec!(5), dec!(10)))?;
                tx.insert(&NewOrder::default())?;
                tx.insert(&NewOrder::sell(dec!(3), dec!(8)))?;
                tx.list_active()
            })
            .unwrap();

        let ids: Vec<i64> = active.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_apply_delta_clamps_and_persists() {
        let db = database();
        let order = db
            .transaction(|tx| {
                let id = tx.insert(&NewOrder::buy(dec!(10), dec!(50)))?;
                tx.apply_delta(id, dec!(4), dec!(0))?;
                tx.apply_delta(id, dec!(0), dec!(7))?;
                Ok(tx.list_all_orders()?.remove(0))
            })
            .unwrap();

        assert_eq!(order.buyer_qty, dec!(6));
        assert_eq!(order.seller_qty, dec!(0));
        assert_eq!(order.buyer_price, dec!(50));
    }

    #[test]
    fn test_apply_delta_unknown_row() {
        let db = database();
        let err = db
            .transaction(|tx| tx.apply_delta(42, dec!(1), dec!(0)))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::RowNotFound(42)));
    }

    #[test]
    fn test_delete_where_exhausted() {
        let db = database();
        let (removed, remaining) = db
            .transaction(|tx| {
                let a = tx.insert(&NewOrder::buy(dec!(2), dec!(10)))?;
                let b = tx.insert(&NewOrder::sell(dec!(2), dec!(10)))?;
                tx.insert(&NewOrder::sell(dec!(1), dec!(12)))?;
                tx.apply_delta(a, dec!(2), dec!(0))?;
                tx.apply_delta(b, dec!(0), dec!(2))?;
                let removed = tx.delete_where_exhausted()?;
                Ok((removed, tx.list_all_orders()?))
            })
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 3);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let db = database();
        let result: Result<(), DatabaseError> = db.transaction(|tx| {
            tx.insert(&NewOrder::buy(dec!(1), dec!(10)))?;
            Err(DatabaseError::QueryError("boom".to_string()))
        });
        assert!(result.is_err());

        let orders = db.transaction(|tx| tx.list_all_orders()).unwrap();
        assert!(orders.is_empty());
    }
}
