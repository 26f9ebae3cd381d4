//! Unit-of-work seam between the matching engine and storage
//!
//! The engine never talks to a table directly. It asks a [`Database`] for a
//! transaction and works through the [`StoreTransaction`] handed to its
//! closure. Returning `Err` from the closure rolls back every write made
//! through that handle; returning `Ok` commits them together.

use super::connection::DatabaseError;
use super::repositories::{PendingOrderStore, TradeLedger};

/// Everything reachable inside one transaction: the pending-order table and
/// the trade ledger
pub trait StoreTransaction: PendingOrderStore + TradeLedger {}

impl<T: PendingOrderStore + TradeLedger> StoreTransaction for T {}

/// A store that can run closures atomically
pub trait Database: Send + Sync {
    /// Run `f` inside one transaction.
    ///
    /// All writes made through the handle become visible together when `f`
    /// returns `Ok`, and none of them do when it returns `Err`.
    fn transaction<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, DatabaseError>;
}
