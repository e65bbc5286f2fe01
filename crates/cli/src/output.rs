//! Table and JSON rendering for command output.

use anyhow::Result;
use cldex_data::MarketSnapshot;
use cldex_domain::entities::{Pair, Token, TradeHistoryEntry};
use cldex_domain::math::constant_product::calculate_spot_price;
use cldex_domain::value_objects::{Amount, ScaledPrice};
use cldex_market::{LockedValue, OpenOrder, OrderBook, PairOverview};
use prettytable::{Table, format, row};
use serde::Serialize;

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC; out-of-range stamps render empty.
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn tokens_table(snapshot: &MarketSnapshot, balance_of: impl Fn(&Token) -> u64) -> Table {
    let mut table = new_table();
    table.set_titles(row![
        "#", "Symbol", "Contract", "Decimals", "Tradable", "Bridgeable", "Bridge fee", "Balance"
    ]);
    for token in snapshot.tokens.iter() {
        let contract = if token.is_native() {
            "(native)"
        } else {
            token.contract_id.as_str()
        };
        table.add_row(row![
            token.index,
            token.symbol,
            contract,
            token.decimals,
            yes_no(token.tradable),
            yes_no(token.bridgeable),
            token.bridge_fee,
            token.amount(balance_of(token))
        ]);
    }
    table
}

pub fn pairs_table(overviews: &[PairOverview], tvl: Option<&LockedValue>) -> Table {
    let mut table = new_table();
    table.set_titles(row![
        "Pair", "Reserve 1", "Reserve 2", "My shares", "Ownership %", "Owned 1", "Owned 2", "Value"
    ]);
    for overview in overviews {
        let value = tvl
            .and_then(|tvl| tvl.per_pair.iter().find(|(key, _)| *key == overview.key))
            .map(|(_, value)| value.round_dp(2).to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![
            overview.key,
            overview.reserve1,
            overview.reserve2,
            overview.my_shares,
            overview.ownership_pct.round_dp(4),
            overview.owned1,
            overview.owned2,
            value
        ]);
    }
    table
}

/// One pool: reserves, spot rates both ways, fee and activity counters.
///
/// Rates read "unknown" while no shares are outstanding.
pub fn pair_status_table(pair: &Pair, token1: &Token, token2: &Token) -> Table {
    let reserve1 = token1.amount(pair.reserve1);
    let reserve2 = token2.amount(pair.reserve2);
    let rate = |reserve_in: Amount, reserve_out: Amount| {
        if pair.shares_outstanding == 0 {
            return "unknown".to_string();
        }
        calculate_spot_price(reserve_in, reserve_out)
            .map(|rate| rate.round_dp(8).normalize().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    };

    let mut table = new_table();
    table.add_row(row!["Pair", pair.key]);
    table.add_row(row!["Contract", pair.contract_id]);
    table.add_row(row![format!("Reserve {}", token1.symbol), reserve1]);
    table.add_row(row![format!("Reserve {}", token2.symbol), reserve2]);
    table.add_row(row![
        format!("1 {} in {}", token1.symbol, token2.symbol),
        rate(reserve1, reserve2)
    ]);
    table.add_row(row![
        format!("1 {} in {}", token2.symbol, token1.symbol),
        rate(reserve2, reserve1)
    ]);
    table.add_row(row!["Fee %", pair.fee().as_percent().normalize()]);
    table.add_row(row!["Shares outstanding", pair.shares_outstanding]);
    table.add_row(row![
        "Adds / removals / swaps",
        format!("{} / {} / {}", pair.adds, pair.removals, pair.swaps)
    ]);
    table
}

/// Asks above bids, best prices meeting in the middle.
pub fn book_table(book: &OrderBook, token1: &Token, token2: &Token) -> Table {
    let mut table = new_table();
    table.set_titles(row![
        "Side",
        format!("Price ({})", token2.symbol),
        format!("Amount ({})", token1.symbol),
        "Total"
    ]);
    for level in book.sells_top_down() {
        table.add_row(row![
            "sell",
            level.price.to_decimal(),
            token1.amount(level.amount),
            token1.amount(level.total)
        ]);
    }
    for level in &book.buys {
        table.add_row(row![
            "buy",
            level.price.to_decimal(),
            token1.amount(level.amount),
            token1.amount(level.total)
        ]);
    }
    table
}

pub fn orders_table(orders: &[OpenOrder], token1: &Token, token2: &Token) -> Table {
    let mut table = new_table();
    table.set_titles(row![
        "Order", "Side", "Price", "Requested 1", "Filled 1", "Unfilled 1", "Requested 2", "Filled 2"
    ]);
    for order in orders {
        let price = order
            .price
            .map(|p| p.to_decimal().to_string())
            .unwrap_or_else(|| "?".to_string());
        table.add_row(row![
            order.order_id,
            order.side.as_str(),
            price,
            token1.amount(order.requested1),
            token1.amount(order.filled1),
            token1.amount(order.unfilled1),
            token2.amount(order.requested2),
            token2.amount(order.filled2)
        ]);
    }
    table
}

pub fn history_table(entries: &[TradeHistoryEntry], token1: &Token, limit: usize) -> Table {
    let mut table = new_table();
    table.set_titles(row!["Time (UTC)", "Amount", "Price"]);
    for entry in entries.iter().take(limit) {
        table.add_row(row![
            format_timestamp(entry.timestamp),
            token1.amount(entry.amount_traded),
            ScaledPrice(entry.price_at_trade).to_decimal()
        ]);
    }
    table
}

/// Prints a prepared call or order as pretty JSON.
pub fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    println!("{label}:");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cldex_domain::entities::PairKey;
    use cldex_market::PriceLevel;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(u64::MAX), "");
    }

    #[test]
    fn test_pair_status_rates() {
        let token1 = Token::new(0, "DERO", "", 5);
        let token2 = Token::new(1, "DUSDT", "usdt", 6);
        let mut pair = Pair::new(PairKey::new("DERO", "DUSDT"), "pool");
        pair.reserve1 = 100_000_000;
        pair.reserve2 = 50_000_000;
        pair.fee_bps = 30;

        let table = pair_status_table(&pair, &token1, &token2);
        assert_eq!(table[4][1].get_content(), "unknown");

        pair.shares_outstanding = 100_000_000;
        let table = pair_status_table(&pair, &token1, &token2);
        // 1000 DERO against 50 DUSDT
        assert_eq!(table[4][1].get_content(), "0.05");
        assert_eq!(table[5][1].get_content(), "20");
    }

    #[test]
    fn test_book_table_rows() {
        let token1 = Token::new(0, "DERO", "", 5);
        let token2 = Token::new(1, "DUSDT", "usdt", 6);
        let level = |price, amount, total| PriceLevel {
            price: ScaledPrice(price),
            amount,
            total,
        };
        let book = OrderBook {
            sells: vec![level(15_000_000, 100, 100), level(16_000_000, 50, 150)],
            buys: vec![level(14_000_000, 70, 70)],
            last_trade: None,
        };
        assert_eq!(book_table(&book, &token1, &token2).len(), 3);
    }

    #[test]
    fn test_pairs_table_values() {
        let key = PairKey::new("DERO", "DUSDT");
        let overview = PairOverview {
            key: key.clone(),
            reserve1: Amount::new(100, 0),
            reserve2: Amount::new(50, 0),
            my_shares: 0,
            ownership_pct: dec!(0),
            owned1: Amount::zero(0),
            owned2: Amount::zero(0),
        };
        let tvl = LockedValue {
            reference: "DUSDT".to_string(),
            total: dec!(100),
            per_pair: vec![(key, dec!(100))],
        };
        let table = pairs_table(&[overview], Some(&tvl));
        assert_eq!(table.len(), 1);
        assert_eq!(table[0][7].get_content(), "100");
    }
}
