use crate::entities::order::{Order, TradeHistoryEntry};
use crate::entities::pair::PairKey;
use crate::value_objects::price::ScaledPrice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one trading (order-book) contract exposes, decoded at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingPairState {
    pub key: PairKey,
    pub contract_id: String,
    pub fee: u64,
    /// Opaque tree roots; only their presence is meaningful.
    pub buy_root: u64,
    pub sell_root: u64,
    pub o1: u64,
    pub o2: u64,
    pub orders: BTreeMap<u64, Order>,
    pub price_table: BTreeMap<u64, u64>,
    pub history: Vec<TradeHistoryEntry>,
}

impl TradingPairState {
    pub fn new(key: PairKey, contract_id: impl Into<String>) -> Self {
        Self {
            key,
            contract_id: contract_id.into(),
            fee: 0,
            buy_root: 0,
            sell_root: 0,
            o1: 0,
            o2: 0,
            orders: BTreeMap::new(),
            price_table: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    /// Resolves an order's price through the price table.
    pub fn price_of(&self, order: &Order) -> Option<ScaledPrice> {
        self.price_table
            .get(&order.price_key)
            .copied()
            .map(ScaledPrice)
    }

    /// Returns the order slot for `order_id`, creating it on first use.
    pub fn order_entry(&mut self, order_id: u64) -> &mut Order {
        self.orders
            .entry(order_id)
            .or_insert_with(|| Order::new(order_id))
    }
}
