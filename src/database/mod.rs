/// Database module for the pending order table and the trade ledger
///
/// This module provides:
/// - SQLite connection pooling and embedded migrations (diesel + r2d2)
/// - Store interfaces and their SQLite implementations
/// - An in-memory store with the same transactional behaviour
/// - The `Database` unit-of-work seam the matching engine runs against

pub mod connection;
#[cfg(test)]
pub(crate) mod fault;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod transaction;

pub use connection::{establish_connection_pool, DatabaseError, SqliteDatabase};
pub use memory::MemoryDatabase;
pub use repositories::{PendingOrderStore, TradeLedger};
pub use transaction::{Database, StoreTransaction};
