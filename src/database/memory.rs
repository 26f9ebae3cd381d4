//! In-process store
//!
//! Tables live behind one mutex. A transaction works on a private copy and
//! swaps it in only on success, so a failed closure leaves nothing behind.

use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::connection::DatabaseError;
use super::repositories::{PendingOrderStore, TradeLedger};
use super::transaction::{Database, StoreTransaction};
use crate::models::{NewOrder, NewTrade, PendingOrder, Trade};

#[derive(Debug, Clone, Default)]
struct Tables {
    orders: BTreeMap<i64, PendingOrder>,
    trades: Vec<Trade>,
    last_order_id: i64,
    last_trade_id: i64,
}

/// Pending orders and trade ledger held in memory
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for MemoryDatabase {
    fn transaction<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, DatabaseError>,
    {
        let mut committed = self.tables.lock();
        let mut working = committed.clone();
        let value = f(&mut working)?;
        *committed = working;
        Ok(value)
    }
}

impl PendingOrderStore for Tables {
    fn insert(&mut self, order: &NewOrder) -> Result<i64, DatabaseError> {
        self.last_order_id += 1;
        let id = self.last_order_id;
        self.orders.insert(id, order.into_pending(id, Utc::now()));
        Ok(id)
    }

    fn list_active(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        Ok(self
            .orders
            .values()
            .filter(|order| order.is_active())
            .cloned()
            .collect())
    }

    fn apply_delta(
        &mut self,
        id: i64,
        buyer_delta: Decimal,
        seller_delta: Decimal,
    ) -> Result<(), DatabaseError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(DatabaseError::RowNotFound(id))?;
        let (buyer_qty, seller_qty) = order.decremented(buyer_delta, seller_delta);
        order.buyer_qty = buyer_qty;
        order.seller_qty = seller_qty;
        Ok(())
    }

    fn delete_where_exhausted(&mut self) -> Result<usize, DatabaseError> {
        let before = self.orders.len();
        self.orders.retain(|_, order| order.is_active());
        Ok(before - self.orders.len())
    }

    fn list_all_orders(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        Ok(self.orders.values().cloned().collect())
    }
}

impl TradeLedger for Tables {
    fn append(&mut self, trade: &NewTrade) -> Result<i64, DatabaseError> {
        self.last_trade_id += 1;
        let id = self.last_trade_id;
        self.trades.push(trade.into_trade(id, Utc::now()));
        Ok(id)
    }

    fn list_all_trades(&mut self) -> Result<Vec<Trade>, DatabaseError> {
        Ok(self.trades.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ids_are_monotonic_across_deletes() {
        let db = MemoryDatabase::new();
        db.transaction(|tx| {
            let id = tx.insert(&NewOrder::buy(dec!(1), dec!(10)))?;
            tx.apply_delta(id, dec!(1), dec!(0))?;
            tx.delete_where_exhausted()
        })
        .unwrap();

        let next = db
            .transaction(|tx| tx.insert(&NewOrder::sell(dec!(1), dec!(10))))
            .unwrap();
        assert_eq!(next, 2);
    }

    #[test]
    fn test_apply_delta_clamps_at_zero() {
        let db = MemoryDatabase::new();
        let order = db
            .transaction(|tx| {
                let id = tx.insert(&NewOrder::sell(dec!(3), dec!(10)))?;
                tx.apply_delta(id, dec!(1), dec!(5))?;
                Ok(tx.list_all_orders()?.remove(0))
            })
            .unwrap();
        assert_eq!(order.buyer_qty, dec!(0));
        assert_eq!(order.seller_qty, dec!(0));
        assert!(order.is_exhausted());
    }

    #[test]
    fn test_failed_transaction_leaves_tables_untouched() {
        let db = MemoryDatabase::new();
        db.transaction(|tx| tx.insert(&NewOrder::buy(dec!(4), dec!(10))))
            .unwrap();

        let result: Result<(), DatabaseError> = db.transaction(|tx| {
            tx.apply_delta(1, dec!(4), dec!(0))?;
            tx.append(&NewTrade {
                price: dec!(10),
                qty: dec!(4),
                buyer_order_id: 1,
                seller_order_id: 9,
            })?;
            tx.delete_where_exhausted()?;
            Err(DatabaseError::QueryError("boom".to_string()))
        });
        assert!(result.is_err());

        let (orders, trades) = db
            .transaction(|tx| Ok((tx.list_all_orders()?, tx.list_all_trades()?)))
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].buyer_qty, dec!(4));
        assert!(trades.is_empty());

        // A rolled-back append must not burn a trade id either
        let id = db
            .transaction(|tx| {
                tx.append(&NewTrade {
                    price: dec!(10),
                    qty: dec!(1),
                    buyer_order_id: 1,
                    seller_order_id: 2,
                })
            })
            .unwrap();
        assert_eq!(id, 1);
    }
}
