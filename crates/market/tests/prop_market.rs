//! Property tests for the router and the order-book reconstructor.

use cldex_data::{MarketSnapshot, PairRegistry, TokenRegistry};
use cldex_domain::entities::{Order, Pair, PairKey, TradingPairState};
use cldex_domain::enums::OrderSide;
use cldex_domain::math::constant_product::calculate_spot_price;
use cldex_domain::value_objects::Amount;
use cldex_market::book::build_book;
use cldex_market::ExchangeGraph;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn funded_pool(a: &str, b: &str, reserve1: u64, reserve2: u64) -> Pair {
    let mut pair = Pair::new(PairKey::new(a, b), format!("{a}{b}"));
    pair.reserve1 = reserve1;
    pair.reserve2 = reserve2;
    pair.shares_outstanding = reserve1;
    pair
}

// ─────────────────────────────────────────────────────────────────
// ROUTER
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// A two-hop rate is the product of both spot rates, up to the 10^7
    /// truncation of each edge.
    #[test]
    fn prop_two_hop_rate_compounds(
        ra in 1_000_000u64..1_000_000_000_000,
        rb1 in 1_000_000u64..1_000_000_000_000,
        rb2 in 1_000_000u64..1_000_000_000_000,
        rc in 1_000_000u64..1_000_000_000_000,
    ) {
        let mut tokens = TokenRegistry::new();
        for symbol in ["A", "B", "C"] {
            tokens.insert(symbol, symbol, 6);
        }
        let mut pairs = PairRegistry::new();
        pairs.insert(funded_pool("A", "B", ra, rb1));
        pairs.insert(funded_pool("B", "C", rb2, rc));
        let snapshot = MarketSnapshot { tokens, pairs, ..Default::default() };

        let graph = ExchangeGraph::build(&snapshot);
        let conversion = graph.convert("A", "C").unwrap();
        prop_assert_eq!(conversion.path.len(), 3);

        let hop1 = calculate_spot_price(Amount::new(ra, 6), Amount::new(rb1, 6)).unwrap();
        let hop2 = calculate_spot_price(Amount::new(rb2, 6), Amount::new(rc, 6)).unwrap();
        let exact = hop1 * hop2;
        let tolerance = (hop1 + hop2 + Decimal::ONE) * dec!(0.0000001);

        prop_assert!(conversion.rate <= exact);
        prop_assert!(exact - conversion.rate <= tolerance,
            "rate {} too far from {}", conversion.rate, exact);
    }

    /// Converting a token to itself never leaves the vertex.
    #[test]
    fn prop_self_conversion_is_identity(r1 in 1u64..u64::MAX, r2 in 1u64..u64::MAX) {
        let mut tokens = TokenRegistry::new();
        tokens.insert("A", "a", 8);
        tokens.insert("B", "b", 8);
        let mut pairs = PairRegistry::new();
        pairs.insert(funded_pool("A", "B", r1, r2));
        let snapshot = MarketSnapshot { tokens, pairs, ..Default::default() };

        let conversion = ExchangeGraph::build(&snapshot).convert("B", "B").unwrap();
        prop_assert_eq!(conversion.rate, Decimal::ONE);
        prop_assert_eq!(conversion.path, vec!["B".to_string()]);
    }
}

// ─────────────────────────────────────────────────────────────────
// ORDER BOOK
// ─────────────────────────────────────────────────────────────────

fn arb_orders() -> impl Strategy<Value = Vec<(u64, u64, bool)>> {
    prop::collection::vec((0u64..8, 0u64..1_000_000, any::<bool>()), 0..40)
}

proptest! {
    /// Levels keep every requested unit, sort strictly by price and carry a
    /// running total that ends at the side's volume.
    #[test]
    fn prop_book_levels_conserve_volume(orders in arb_orders()) {
        let mut state = TradingPairState::new(PairKey::new("A", "B"), "book");
        for key in 0u64..8 {
            state.price_table.insert(key, (key + 1) * 1_000_000);
        }
        let (mut sell_volume, mut buy_volume) = (0u64, 0u64);
        for (id, (price_key, size, is_sell)) in orders.iter().enumerate() {
            let mut order = Order::new(id as u64);
            order.price_key = *price_key;
            order.requested_amount1 = *size;
            order.side = if *is_sell { OrderSide::Sell } else { OrderSide::Buy };
            if *is_sell { sell_volume += size } else { buy_volume += size }
            state.orders.insert(order.order_id, order);
        }

        let book = build_book(&state);

        prop_assert_eq!(book.sells.iter().map(|l| l.amount).sum::<u64>(), sell_volume);
        prop_assert_eq!(book.buys.iter().map(|l| l.amount).sum::<u64>(), buy_volume);
        prop_assert_eq!(book.sells.last().map_or(0, |l| l.total), sell_volume);
        prop_assert_eq!(book.buys.last().map_or(0, |l| l.total), buy_volume);
        prop_assert!(book.sells.windows(2).all(|w| w[0].price < w[1].price));
        prop_assert!(book.buys.windows(2).all(|w| w[0].price > w[1].price));
    }
}
