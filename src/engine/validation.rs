//! Order validation functions
//!
//! Submissions are checked here before anything touches the store. A
//! rejected order is never persisted.

use rust_decimal::Decimal;

use crate::models::NewOrder;

use super::errors::EngineError;

// ============================================================================
// Individual Validation Functions
// ============================================================================

/// Validate that neither side carries a negative quantity, and that at least
/// one side carries a positive one
///
/// # Example
/// ```ignore
/// use rust_decimal_macros::dec;
/// assert!(validate_quantities(dec!(10), dec!(0)).is_ok());
/// assert!(validate_quantities(dec!(0), dec!(0)).is_err());
/// assert!(validate_quantities(dec!(-1), dec!(5)).is_err());
/// ```
pub fn validate_quantities(buyer_qty: Decimal, seller_qty: Decimal) -> Result<(), EngineError> {
    if buyer_qty < Decimal::ZERO || seller_qty < Decimal::ZERO {
        return Err(EngineError::InvalidQuantity(format!(
            "Quantities must not be negative, got buyer_qty={} seller_qty={}",
            buyer_qty, seller_qty
        )));
    }
    if buyer_qty <= Decimal::ZERO && seller_qty <= Decimal::ZERO {
        return Err(EngineError::InvalidQuantity(
            "Either buyer_qty or seller_qty is required.".to_string(),
        ));
    }
    Ok(())
}

/// Validate that neither side carries a negative price, and that at least
/// one side carries a positive one
pub fn validate_prices(buyer_price: Decimal, seller_price: Decimal) -> Result<(), EngineError> {
    if buyer_price < Decimal::ZERO || seller_price < Decimal::ZERO {
        return Err(EngineError::InvalidPrice(format!(
            "Prices must not be negative, got buyer_price={} seller_price={}",
            buyer_price, seller_price
        )));
    }
    if buyer_price <= Decimal::ZERO && seller_price <= Decimal::ZERO {
        return Err(EngineError::InvalidPrice(
            "Either buyer_price or seller_price is required.".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Composite Validation Function
// ============================================================================

/// Validate a submission before it is persisted
///
/// Quantities are checked first, then prices; the first failure is returned.
pub fn validate_new_order(order: &NewOrder) -> Result<(), EngineError> {
    validate_quantities(order.buyer_qty, order.seller_qty)?;
    validate_prices(order.buyer_price, order.seller_price)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
