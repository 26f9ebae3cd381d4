use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{NewTrade, PendingOrder};

// ============================================================================
// Match Plan
// ============================================================================

/// Quantity to take off one pending order row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantityDelta {
    pub buyer: Decimal,
    pub seller: Decimal,
}

/// Everything one matching run decided, before any of it is written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchPlan {
    /// Trades in execution order
    pub trades: Vec<NewTrade>,
    /// Accumulated decrements per order id
    pub deltas: BTreeMap<i64, QuantityDelta>,
}

impl MatchPlan {
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    #[cfg(test)]
    fn traded_quantity(&self) -> Decimal {
        self.trades.iter().map(|t| t.qty).sum()
    }

    fn record(&mut self, buyer: &PendingOrder, seller: &PendingOrder, qty: Decimal) {
        self.trades.push(NewTrade {
            price: seller.seller_price,
            qty,
            buyer_order_id: buyer.id,
            seller_order_id: seller.id,
        });
        self.deltas.entry(buyer.id).or_default().buyer += qty;
        self.deltas.entry(seller.id).or_default().seller += qty;
    }
}

// ============================================================================
// Crossing
// ============================================================================

/// A buy side crosses a sell side when it bids at or above the ask
pub fn crosses(buyer: &PendingOrder, seller: &PendingOrder) -> bool {
    buyer.buyer_price >= seller.seller_price
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Pair every crossable buy side with sell sides, FIFO by id.
///
/// `orders` must be ascending by id. Buyers are visited in id order, and for
/// each buyer the sellers are scanned in id order. Each match trades
/// `min(buyer remaining, seller remaining)` at the seller's price. Remaining
/// quantities are tracked per row across the whole run: a buyer stops once it
/// is filled, and whatever a seller has left carries over to later buyers.
///
/// A row carrying both sides takes part in both scans, including against itself.
pub fn plan_matches(orders: &[PendingOrder]) -> MatchPlan {
    debug_assert!(
        orders.windows(2).all(|pair| pair[0].id < pair[1].id),
        "pending orders must be ascending by id"
    );

    let buyers: Vec<&PendingOrder> = orders.iter().filter(|o| o.is_buyer()).collect();
    let sellers: Vec<&PendingOrder> = orders.iter().filter(|o| o.is_seller()).collect();
    let mut seller_remaining: Vec<Decimal> = sellers.iter().map(|s| s.seller_qty).collect();

    let mut plan = MatchPlan::default();

    for buyer in buyers {
        let mut buyer_remaining = buyer.buyer_qty;

        for (seller, remaining) in sellers.iter().zip(seller_remaining.iter_mut()) {
            if !crosses(buyer, seller) {
                continue;
            }

            let qty = buyer_remaining.min(*remaining);
            if qty <= Decimal::ZERO {
                continue;
            }

            plan.record(buyer, seller, qty);
            buyer_remaining -= qty;
            *remaining -= qty;

            if buyer_remaining <= Decimal::ZERO {
                break;
            }
        }
    }

    plan
}

// ============================================================================
// Tests
// ============================================================================
