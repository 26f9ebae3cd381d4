pub mod order;
pub mod trade;

pub use order::{NewOrder, PendingOrder};
pub use trade::{NewTrade, Trade};
