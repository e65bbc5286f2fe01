//! Order-book views over a decoded trading contract.
//!
//! Matching happens on chain; these functions only arrange what the
//! contract already holds.

use cldex_domain::entities::{TradeHistoryEntry, TradingPairState};
use cldex_domain::enums::OrderSide;
use cldex_domain::value_objects::ScaledPrice;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// All volume resting at one exact price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    pub price: ScaledPrice,
    /// Requested token1 amount summed over the level's orders.
    pub amount: u64,
    /// Running sum of `amount` from the best level through this one.
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderBook {
    /// Ascending by price, best ask first.
    pub sells: Vec<PriceLevel>,
    /// Descending by price, best bid first.
    pub buys: Vec<PriceLevel>,
    pub last_trade: Option<TradeHistoryEntry>,
}

impl OrderBook {
    /// Asks from the highest price down to the best ask, the order in which
    /// a book is printed above the bids.
    pub fn sells_top_down(&self) -> impl Iterator<Item = &PriceLevel> {
        self.sells.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.sells.is_empty() && self.buys.is_empty()
    }
}

/// Aggregates every order of `state` into price levels per side.
///
/// An order whose price key is missing from the price table rests at price
/// zero.
pub fn build_book(state: &TradingPairState) -> OrderBook {
    let mut sells: BTreeMap<u64, u64> = BTreeMap::new();
    let mut buys: BTreeMap<u64, u64> = BTreeMap::new();

    for order in state.orders.values() {
        let price = state.price_of(order).unwrap_or_else(|| {
            warn!(
                pair = %state.key,
                order = order.order_id,
                price_key = order.price_key,
                "Order price key missing from price table"
            );
            ScaledPrice::default()
        });
        let side = match order.side {
            OrderSide::Sell => &mut sells,
            OrderSide::Buy => &mut buys,
        };
        let level = side.entry(price.0).or_default();
        *level = level.saturating_add(order.requested_amount1);
    }

    OrderBook {
        sells: accumulate(sells.into_iter()),
        buys: accumulate(buys.into_iter().rev()),
        last_trade: last_trade(state),
    }
}

fn accumulate(levels: impl Iterator<Item = (u64, u64)>) -> Vec<PriceLevel> {
    let mut total = 0u64;
    levels
        .map(|(price, amount)| {
            total = total.saturating_add(amount);
            PriceLevel {
                price: ScaledPrice(price),
                amount,
                total,
            }
        })
        .collect()
}

/// One of the account's resting orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenOrder {
    pub order_id: u64,
    pub side: OrderSide,
    pub price: Option<ScaledPrice>,
    pub requested1: u64,
    pub requested2: u64,
    pub filled1: u64,
    pub filled2: u64,
    pub unfilled1: u64,
    pub unfilled2: u64,
}

/// Orders owned by `owner_public_key`, ascending by order id.
pub fn my_orders(state: &TradingPairState, owner_public_key: &str) -> Vec<OpenOrder> {
    // BTreeMap iteration is already ordered by id.
    state
        .orders
        .values()
        .filter(|order| order.owner_public_key == owner_public_key)
        .map(|order| OpenOrder {
            order_id: order.order_id,
            side: order.side,
            price: state.price_of(order),
            requested1: order.requested_amount1,
            requested2: order.requested_amount2,
            filled1: order.filled_amount1,
            filled2: order.filled_amount2,
            unfilled1: order.unfilled_amount1(),
            unfilled2: order.unfilled_amount2(),
        })
        .collect()
}

/// Trade history, newest first.
pub fn history(state: &TradingPairState) -> Vec<TradeHistoryEntry> {
    let mut entries = state.history.clone();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

pub fn last_trade(state: &TradingPairState) -> Option<TradeHistoryEntry> {
    state.history.iter().max_by_key(|entry| entry.timestamp).copied()
}
