/// Store interfaces used inside a matching transaction, with their SQLite
/// implementations. The in-memory implementations live in `database::memory`.

pub mod pending_order_repository;
pub mod trade_repository;

pub use pending_order_repository::PendingOrderStore;
pub use trade_repository::TradeLedger;
