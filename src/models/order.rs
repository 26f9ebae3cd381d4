use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A resting order row.
///
/// One row carries a buy side (`buyer_qty` at `buyer_price`) and a sell side
/// (`seller_qty` at `seller_price`). Only one side is populated in normal use,
/// but nothing forbids both. The `id` is assigned on insertion and is the only
/// priority key: lower ids are matched first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PendingOrder {
    pub id: i64,
    #[schema(value_type = f64, example = 10.0)]
    #[serde(with = "rust_decimal::serde::float")]
    pub buyer_qty: Decimal,
    #[schema(value_type = f64, example = 100.50)]
    #[serde(with = "rust_decimal::serde::float")]
    pub buyer_price: Decimal,
    #[schema(value_type = f64, example = 0.0)]
    #[serde(with = "rust_decimal::serde::float")]
    pub seller_qty: Decimal,
    #[schema(value_type = f64, example = 0.0)]
    #[serde(with = "rust_decimal::serde::float")]
    pub seller_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl PendingOrder {
    /// Whether the row still has buy interest
    pub fn is_buyer(&self) -> bool {
        self.buyer_qty > Decimal::ZERO
    }

    /// Whether the row still has sell interest
    pub fn is_seller(&self) -> bool {
        self.seller_qty > Decimal::ZERO
    }

    /// A row takes part in matching while either side has quantity left
    pub fn is_active(&self) -> bool {
        self.is_buyer() || self.is_seller()
    }

    /// Both sides are used up; the row must not survive a matching run
    pub fn is_exhausted(&self) -> bool {
        !self.is_active()
    }

    /// Quantities left after taking `buyer_delta` and `seller_delta` off the row.
    ///
    /// Clamped at zero on both sides.
    pub fn decremented(&self, buyer_delta: Decimal, seller_delta: Decimal) -> (Decimal, Decimal) {
        (
            (self.buyer_qty - buyer_delta).max(Decimal::ZERO),
            (self.seller_qty - seller_delta).max(Decimal::ZERO),
        )
    }
}

/// A submission that has not been persisted yet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NewOrder {
    pub buyer_qty: Decimal,
    pub buyer_price: Decimal,
    pub seller_qty: Decimal,
    pub seller_price: Decimal,
}

impl NewOrder {
    /// Buy interest only
    pub fn buy(qty: Decimal, price: Decimal) -> Self {
        Self {
            buyer_qty: qty,
            buyer_price: price,
            ..Self::default()
        }
    }

    /// Sell interest only
    pub fn sell(qty: Decimal, price: Decimal) -> Self {
        Self {
            seller_qty: qty,
            seller_price: price,
            ..Self::default()
        }
    }

    /// Materialize the row a store would hold for this submission
    pub fn into_pending(self, id: i64, created_at: DateTime<Utc>) -> PendingOrder {
        PendingOrder {
            id,
            buyer_qty: self.buyer_qty,
            buyer_price: self.buyer_price,
            seller_qty: self.seller_qty,
            seller_price: self.seller_price,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sides_and_activity() {
        let buyer = NewOrder::buy(dec!(10), dec!(100)).into_pending(1, Utc::now());
        assert!(buyer.is_buyer());
        assert!(!buyer.is_seller());
        assert!(buyer.is_active());

        let empty = NewOrder::default().into_pending(2, Utc::now());
        assert!(empty.is_exhausted());
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let order = NewOrder {
            buyer_qty: dec!(5),
            buyer_price: dec!(10),
            seller_qty: dec!(3),
            seller_price: dec!(9),
        }
        .into_pending(1, Utc::now());

        assert_eq!(order.decremented(dec!(2), dec!(0)), (dec!(3), dec!(3)));
        assert_eq!(order.decremented(dec!(8), dec!(4)), (dec!(0), dec!(0)));
    }
}
