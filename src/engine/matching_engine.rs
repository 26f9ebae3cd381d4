//! Matching Engine
//!
//! `MatchingEngine` owns the store and serializes every state change behind
//! one lock. A matching run reads the active orders, plans all matches,
//! appends the trades, applies the quantity decrements and removes exhausted
//! rows, all inside a single storage transaction that is committed or rolled
//! back as a whole.

use parking_lot::{Mutex, MutexGuard};

use crate::database::{Database, DatabaseError, PendingOrderStore, StoreTransaction, TradeLedger};
use crate::models::{NewOrder, PendingOrder, Trade};

use super::errors::EngineError;
use super::matching::plan_matches;
use super::validation::validate_new_order;

/// Last committed contents of both tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookState {
    pub pending_orders: Vec<PendingOrder>,
    pub completed_orders: Vec<Trade>,
}

/// Outcome of one committed matching run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchReport {
    /// Pending orders after the run
    pub pending_orders: Vec<PendingOrder>,
    /// The whole trade ledger after the run
    pub completed_orders: Vec<Trade>,
    /// Trades created by this run, in execution order
    pub executed: Vec<Trade>,
    /// Rows deleted because both sides were used up
    pub removed_orders: usize,
}

/// Operations the service layer needs from an engine, independent of the store
pub trait MatchingService: Send + Sync {
    /// Validate and persist an order. Returns the new order id.
    fn submit_order(&self, order: NewOrder) -> Result<i64, EngineError>;

    /// Persist an order, then run matching without letting another run in between
    fn submit_and_match(&self, order: NewOrder) -> Result<(i64, MatchReport), EngineError>;

    /// Match everything that currently crosses
    fn run_matching(&self) -> Result<MatchReport, EngineError>;

    /// Read both tables without changing anything
    fn read_state(&self) -> Result<BookState, EngineError>;
}

/// Thread-safe double-auction matching engine over a transactional store
pub struct MatchingEngine<D> {
    database: D,
    // Held across the whole read-compute-write sequence of a run, and around
    // every insert, so no two writers ever work from the same snapshot
    write_lock: Mutex<()>,
}

impl<D: Database> MatchingEngine<D> {
    /// Create a new matching engine over `database`
    pub fn new(database: D) -> Self {
        Self {
            database,
            write_lock: Mutex::new(()),
        }
    }

    fn insert_locked(&self, _guard: &MutexGuard<'_, ()>, order: NewOrder) -> Result<i64, EngineError> {
        if let Err(e) = validate_new_order(&order) {
            tracing::warn!("Rejected order submission: {}", e);
            return Err(e);
        }

        let order_id = self.database.transaction(|tx| tx.insert(&order))?;

        tracing::info!(
            "Order {} accepted (buy {} @ {}, sell {} @ {})",
            order_id,
            order.buyer_qty,
            order.buyer_price,
            order.seller_qty,
            order.seller_price
        );

        Ok(order_id)
    }

    fn run_locked(&self, _guard: &MutexGuard<'_, ()>) -> Result<MatchReport, EngineError> {
        match self.database.transaction(execute_run) {
            Ok(report) => {
                tracing::info!(
                    "Matching run committed: {} trades, {} orders removed, {} still pending",
                    report.executed.len(),
                    report.removed_orders,
                    report.pending_orders.len()
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Matching run rolled back: {}", e);
                Err(EngineError::from(e))
            }
        }
    }
}

/// One matching run against an open transaction
fn execute_run(tx: &mut dyn StoreTransaction) -> Result<MatchReport, DatabaseError> {
    let active = tx.list_active()?;
    let plan = plan_matches(&active);

    let mut executed_ids = Vec::with_capacity(plan.trades.len());
    for trade in &plan.trades {
        let trade_id = tx.append(trade)?;
        tracing::debug!(
            "Trade {}: {} @ {} (buyer order {}, seller order {})",
            trade_id,
            trade.qty,
            trade.price,
            trade.buyer_order_id,
            trade.seller_order_id
        );
        executed_ids.push(trade_id);
    }

    for (order_id, delta) in &plan.deltas {
        tx.apply_delta(*order_id, delta.buyer, delta.seller)?;
    }

    let removed_orders = tx.delete_where_exhausted()?;
    let pending_orders = tx.list_all_orders()?;
    let completed_orders = tx.list_all_trades()?;

    let executed = completed_orders
        .iter()
        .filter(|trade| executed_ids.contains(&trade.id))
        .cloned()
        .collect();

    Ok(MatchReport {
        pending_orders,
        completed_orders,
        executed,
        removed_orders,
    })
}

impl<D: Database> MatchingService for MatchingEngine<D> {
    fn submit_order(&self, order: NewOrder) -> Result<i64, EngineError> {
        let guard = self.write_lock.lock();
        self.insert_locked(&guard, order)
    }

    fn submit_and_match(&self, order: NewOrder) -> Result<(i64, MatchReport), EngineError> {
        let guard = self.write_lock.lock();
        let order_id = self.insert_locked(&guard, order)?;
        let report = self.run_locked(&guard)?;
        Ok((order_id, report))
    }

    fn run_matching(&self) -> Result<MatchReport, EngineError> {
        let guard = self.write_lock.lock();
        self.run_locked(&guard)
    }

    fn read_state(&self) -> Result<BookState, EngineError> {
        let state = self.database.transaction(|tx| {
            Ok(BookState {
                pending_orders: tx.list_all_orders()?,
                completed_orders: tx.list_all_trades()?,
            })
        })?;
        Ok(state)
    }
}
