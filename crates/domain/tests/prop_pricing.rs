//! Property tests for the fixed-point utility and the AMM pricing engine.

use cldex_domain::entities::{Pair, PairKey};
use cldex_domain::math::constant_product::{calculate_k, quote_swap};
use cldex_domain::math::liquidity::{plan_add_liquidity, size_remove_liquidity};
use cldex_domain::math::mul_div;
use cldex_domain::value_objects::RemovalPercent;
use cldex_domain::MathError;
use primitive_types::U512;
use proptest::prelude::*;

fn pool(reserve1: u64, reserve2: u64, shares: u64, fee_bps: u64) -> Pair {
    let mut pair = Pair::new(PairKey::new("A", "B"), "scid");
    pair.reserve1 = reserve1;
    pair.reserve2 = reserve2;
    pair.shares_outstanding = shares;
    pair.fee_bps = fee_bps;
    pair
}

fn near_max() -> impl Strategy<Value = u64> {
    prop_oneof![
        any::<u64>(),
        (u64::MAX - 1024)..=u64::MAX,
        0u64..1024,
    ]
}

// ─────────────────────────────────────────────────────────────────
// FIXED POINT
// ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn mul_div_matches_wide_reference(a in near_max(), b in near_max(), c in near_max()) {
        let result = mul_div(a, b, c);
        if c == 0 {
            prop_assert_eq!(result, Err(MathError::DivisionByZero));
        } else {
            let reference = U512::from(a) * U512::from(b) / U512::from(c);
            if reference > U512::from(u64::MAX) {
                prop_assert_eq!(result, Err(MathError::Overflow));
            } else {
                prop_assert_eq!(result, Ok(reference.low_u64()));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// SWAPS
// ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn swap_output_never_exceeds_reserve(
        reserve_in in 1u64..=u64::MAX,
        reserve_out in 1u64..=u64::MAX,
        fee in 0u64..=10_000,
        amount_in in any::<u64>(),
        token1 in any::<bool>(),
    ) {
        let pair = if token1 {
            pool(reserve_in, reserve_out, 1, fee)
        } else {
            pool(reserve_out, reserve_in, 1, fee)
        };
        let quote = quote_swap(&pair, token1, amount_in).unwrap();
        prop_assert!(quote.amount_out <= quote.raw_out);
        prop_assert!(quote.raw_out < reserve_out || amount_in == 0);
    }

    #[test]
    fn swap_output_is_monotonic(
        reserve_in in 1_000u64..1_000_000_000_000,
        reserve_out in 1_000u64..1_000_000_000_000,
        fee in 0u64..=1_000,
        amount_in in 1u64..1_000_000_000_000,
        extra in 1u64..1_000_000_000,
    ) {
        let pair = pool(reserve_in, reserve_out, 1, fee);
        let smaller = quote_swap(&pair, true, amount_in).unwrap();
        let larger = quote_swap(&pair, true, amount_in + extra).unwrap();
        prop_assert!(larger.raw_out >= smaller.raw_out);
        prop_assert!(larger.amount_out >= smaller.amount_out);
        prop_assert!(larger.slippage_pct >= smaller.slippage_pct);
    }

    #[test]
    fn swap_never_decreases_k(
        reserve_in in 1u64..u64::MAX / 4,
        reserve_out in 1u64..u64::MAX / 4,
        fee in 0u64..=10_000,
        amount_in in 0u64..u64::MAX / 4,
    ) {
        let pair = pool(reserve_in, reserve_out, 1, fee);
        let quote = quote_swap(&pair, true, amount_in).unwrap();
        let before = calculate_k(reserve_in, reserve_out);
        let after = calculate_k(reserve_in + amount_in, reserve_out - quote.amount_out);
        prop_assert!(after >= before);
    }
}

// ─────────────────────────────────────────────────────────────────
// LIQUIDITY ROUND TRIP
// ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn add_then_remove_all_returns_deposit(
        reserve1 in 1u64..1_000_000_000_000,
        reserve2 in 1u64..1_000_000_000_000,
        amount1 in 1u64..1_000_000_000_000,
    ) {
        // shares issued one per token1 base unit
        let pair = pool(reserve1, reserve2, reserve1, 30);
        let plan = plan_add_liquidity(&pair, amount1, true).unwrap();
        let minted = plan.shares_minted.unwrap();
        let after = pair.with_deposit(plan.amount1, plan.amount2, minted);

        let removal = size_remove_liquidity(&after, minted, RemovalPercent::full()).unwrap();
        prop_assert!(plan.amount1.abs_diff(removal.amount1) <= 1);
        prop_assert!(plan.amount2.abs_diff(removal.amount2) <= 1);
        prop_assert!(removal.amount1 <= plan.amount1);
        prop_assert!(removal.amount2 <= plan.amount2);
    }
}
