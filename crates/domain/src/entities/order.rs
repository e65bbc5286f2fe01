use crate::enums::OrderSide;
use serde::{Deserialize, Serialize};

/// A limit order resting in a trading pair's contract storage.
///
/// The price is indirect: `price_key` indexes the pair's price table, and
/// several orders may share one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub price_key: u64,
    pub requested_amount1: u64,
    pub requested_amount2: u64,
    pub filled_amount1: u64,
    pub filled_amount2: u64,
    pub side: OrderSide,
    pub owner_public_key: String,
}

impl Order {
    pub fn new(order_id: u64) -> Self {
        Self {
            order_id,
            price_key: 0,
            requested_amount1: 0,
            requested_amount2: 0,
            filled_amount1: 0,
            filled_amount2: 0,
            side: OrderSide::Buy,
            owner_public_key: String::new(),
        }
    }

    pub fn unfilled_amount1(&self) -> u64 {
        self.requested_amount1.saturating_sub(self.filled_amount1)
    }

    pub fn unfilled_amount2(&self) -> u64 {
        self.requested_amount2.saturating_sub(self.filled_amount2)
    }
}

/// One executed trade, as recorded by the trading contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHistoryEntry {
    /// Unix seconds.
    pub timestamp: u64,
    /// Token1 base units.
    pub amount_traded: u64,
    /// Scaled by `PRICE_SCALE`.
    pub price_at_trade: u64,
}
