use rust_decimal::Decimal;
use std::str::FromStr;

use crate::database::connection::DatabaseError;

pub mod completed_order;
pub mod pending_order;

pub use completed_order::{CompletedOrderRow, NewCompletedOrderRow};
pub use pending_order::{encode_decimal, NewPendingOrderRow, PendingOrderRow};

/// Parse a decimal column, naming the column when the stored text is unusable
pub(crate) fn parse_decimal(column: &str, value: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(value)
        .map_err(|e| DatabaseError::CorruptValue(format!("{} = {:?}: {}", column, value, e)))
}
