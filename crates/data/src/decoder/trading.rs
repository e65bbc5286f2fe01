use crate::keys::TradeKey;
use crate::value::{ContractVars, parse_u64_or_zero};
use cldex_domain::entities::{PairKey, TradeHistoryEntry, TradingPairState};
use cldex_domain::enums::OrderSide;
use tracing::{debug, trace};

/// Decodes the storage of one order-book contract.
///
/// Order fields are scattered over `<tag>:<order id>` keys and are gathered
/// per order id. Prices stay indirect: orders keep their `price_key` and the
/// price table is decoded alongside.
pub fn decode_trading_state(key: PairKey, contract: &str, vars: &ContractVars) -> TradingPairState {
    let mut state = TradingPairState::new(key, contract);

    for (name, value) in vars {
        match TradeKey::parse(name) {
            TradeKey::Fee => state.fee = value.as_u64(),
            TradeKey::BuyRoot => state.buy_root = value.as_u64(),
            TradeKey::SellRoot => state.sell_root = value.as_u64(),
            TradeKey::Counter1 => state.o1 = value.as_u64(),
            TradeKey::Counter2 => state.o2 = value.as_u64(),
            TradeKey::History(_) => {
                let text = value.decoded_text().unwrap_or_default();
                state.history.push(parse_history_entry(&text));
            }
            TradeKey::OrderPriceKey(id) => state.order_entry(id).price_key = value.as_u64(),
            TradeKey::OrderRequested1(id) => {
                state.order_entry(id).requested_amount1 = value.as_u64();
            }
            TradeKey::OrderRequested2(id) => {
                state.order_entry(id).requested_amount2 = value.as_u64();
            }
            TradeKey::OrderFilled1(id) => state.order_entry(id).filled_amount1 = value.as_u64(),
            TradeKey::OrderFilled2(id) => state.order_entry(id).filled_amount2 = value.as_u64(),
            TradeKey::OrderSide(id) => {
                let tag = value.decoded_text().unwrap_or_default();
                state.order_entry(id).side = OrderSide::from_tag(&tag);
            }
            TradeKey::OrderOwner(id) => {
                state.order_entry(id).owner_public_key =
                    value.raw_text().unwrap_or_default().to_string();
            }
            TradeKey::Price(price_key) => {
                state.price_table.insert(price_key, value.as_u64());
            }
            TradeKey::Other => trace!(key = name.as_str(), "Ignoring trading contract key"),
        }
    }

    debug!(
        pair = %state.key,
        orders = state.orders.len(),
        prices = state.price_table.len(),
        trades = state.history.len(),
        "Decoded trading pair"
    );
    state
}

/// Parses `<prefix>:<timestamp>:<amount1>:<price>`. The prefix is dropped and
/// missing or unparsable fields read as zero.
pub fn parse_history_entry(text: &str) -> TradeHistoryEntry {
    let mut fields = text.split(':').skip(1).map(parse_u64_or_zero);
    TradeHistoryEntry {
        timestamp: fields.next().unwrap_or(0),
        amount_traded: fields.next().unwrap_or(0),
        price_at_trade: fields.next().unwrap_or(0),
    }
}
