//! Failure injection for rollback tests
//!
//! [`FailingDatabase`] wraps any [`Database`] and makes the n-th write of each
//! transaction fail, after the earlier writes already went through.

use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::connection::DatabaseError;
use super::repositories::{PendingOrderStore, TradeLedger};
use super::transaction::{Database, StoreTransaction};
use crate::models::{NewOrder, NewTrade, PendingOrder, Trade};

pub struct FailingDatabase<D> {
    inner: D,
    fail_on_write: AtomicUsize,
}

impl<D: Database> FailingDatabase<D> {
    /// Fail the `fail_on_write`-th write (1-based) of every transaction
    pub fn new(inner: D, fail_on_write: usize) -> Self {
        Self {
            inner,
            fail_on_write: AtomicUsize::new(fail_on_write),
        }
    }

    /// Stop injecting failures
    pub fn disarm(&self) {
        self.fail_on_write.store(0, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Database> Database for FailingDatabase<D> {
    fn transaction<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, DatabaseError>,
    {
        let fail_on_write = self.fail_on_write.load(Ordering::SeqCst);
        self.inner.transaction(|tx| {
            let mut faulty = FaultyTransaction {
                inner: tx,
                writes: 0,
                fail_on_write,
            };
            f(&mut faulty)
        })
    }
}

struct FaultyTransaction<'a> {
    inner: &'a mut dyn StoreTransaction,
    writes: usize,
    fail_on_write: usize,
}

impl FaultyTransaction<'_> {
    fn write(&mut self) -> Result<(), DatabaseError> {
        self.writes += 1;
        if self.fail_on_write != 0 && self.writes == self.fail_on_write {
            return Err(DatabaseError::QueryError(format!(
                "injected failure on write {}",
                self.writes
            )));
        }
        Ok(())
    }
}

impl PendingOrderStore for FaultyTransaction<'_> {
    fn insert(&mut self, order: &NewOrder) -> Result<i64, DatabaseError> {
        self.write()?;
        self.inner.insert(order)
    }

    fn list_active(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        self.inner.list_active()
    }

    fn apply_delta(
        &mut self,
        id: i64,
        buyer_delta: Decimal,
        seller_delta: Decimal,
    ) -> Result<(), DatabaseError> {
        self.write()?;
        self.inner.apply_delta(id, buyer_delta, seller_delta)
    }

    fn delete_where_exhausted(&mut self) -> Result<usize, DatabaseError> {
        self.write()?;
        self.inner.delete_where_exhausted()
    }

    fn list_all_orders(&mut self) -> Result<Vec<PendingOrder>, DatabaseError> {
        self.inner.list_all_orders()
    }
}

impl TradeLedger for FaultyTransaction<'_> {
    fn append(&mut self, trade: &NewTrade) -> Result<i64, DatabaseError> {
        self.write()?;
        self.inner.append(trade)
    }

    fn list_all_trades(&mut self) -> Result<Vec<Trade>, DatabaseError> {
        self.inner.list_all_trades()
    }
}
