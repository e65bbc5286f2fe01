//! Liquidity add/remove sizing.
//!
//! All token amounts are derived with [`mul_div`], so every quantity floors
//! toward zero and a deposit followed by a full withdrawal never returns more
//! than was put in.

use crate::entities::pair::Pair;
use crate::error::PricingError;
use crate::math::fixed_point::mul_div;
use crate::value_objects::percentage::RemovalPercent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amounts of a deposit into a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityPlan {
    pub amount1: u64,
    pub amount2: u64,
    /// Estimated shares minted; unknown for the first deposit.
    pub shares_minted: Option<u64>,
}

impl AddLiquidityPlan {
    /// First deposit into an empty pool: both sides come from the caller.
    pub fn initial(amount1: u64, amount2: u64) -> Self {
        Self {
            amount1,
            amount2,
            shares_minted: None,
        }
    }
}

/// Amounts of a withdrawal from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityPlan {
    /// Reserves currently owned by the account.
    pub owned1: u64,
    pub owned2: u64,
    /// Reserves withdrawn at `percent`.
    pub amount1: u64,
    pub amount2: u64,
    pub shares_to_burn: u64,
    pub percent: RemovalPercent,
}

/// Sizes the other side of a deposit so the pool's price ratio is preserved.
///
/// `other = side * reserve_other / reserve_side`. An empty pool has no price
/// yet, so the caller must supply both sides itself.
pub fn size_add_liquidity(
    pair: &Pair,
    side_amount: u64,
    side_is_token1: bool,
) -> Result<u64, PricingError> {
    if pair.shares_outstanding == 0 {
        return Err(PricingError::InitialDepositRequired);
    }
    let (reserve_side, reserve_other) = pair.reserves(side_is_token1);
    if reserve_side == 0 {
        return Err(PricingError::NoLiquidity);
    }
    Ok(mul_div(side_amount, reserve_other, reserve_side)?)
}

/// Sizes both sides of a deposit and estimates the shares it mints.
pub fn plan_add_liquidity(
    pair: &Pair,
    side_amount: u64,
    side_is_token1: bool,
) -> Result<AddLiquidityPlan, PricingError> {
    let other = size_add_liquidity(pair, side_amount, side_is_token1)?;
    let (amount1, amount2) = if side_is_token1 {
        (side_amount, other)
    } else {
        (other, side_amount)
    };
    Ok(AddLiquidityPlan {
        amount1,
        amount2,
        shares_minted: Some(estimate_minted_shares(pair, amount1)?),
    })
}

/// Shares minted for a deposit of `amount1`, pro rata to token1's reserve.
pub fn estimate_minted_shares(pair: &Pair, amount1: u64) -> Result<u64, PricingError> {
    if pair.reserve1 == 0 || pair.shares_outstanding == 0 {
        return Err(PricingError::NoLiquidity);
    }
    Ok(mul_div(amount1, pair.shares_outstanding, pair.reserve1)?)
}

/// Reserves owned by `my_shares`: `reserve * my_shares / shares_outstanding`.
pub fn owned_reserves(pair: &Pair, my_shares: u64) -> Result<(u64, u64), PricingError> {
    if pair.shares_outstanding == 0 {
        return Err(PricingError::NoLiquidity);
    }
    Ok((
        mul_div(pair.reserve1, my_shares, pair.shares_outstanding)?,
        mul_div(pair.reserve2, my_shares, pair.shares_outstanding)?,
    ))
}

/// Sizes withdrawing `percent` of the position held by `my_shares`.
///
/// Owned reserves, withdrawn amounts and burned shares all floor through the
/// same integer policy; nothing passes through a binary float.
pub fn size_remove_liquidity(
    pair: &Pair,
    my_shares: u64,
    percent: RemovalPercent,
) -> Result<RemoveLiquidityPlan, PricingError> {
    if my_shares == 0 {
        return Err(PricingError::NoShares);
    }
    let (owned1, owned2) = owned_reserves(pair, my_shares)?;

    Ok(RemoveLiquidityPlan {
        owned1,
        owned2,
        amount1: percent.apply(owned1)?,
        amount2: percent.apply(owned2)?,
        shares_to_burn: percent.apply(my_shares)?,
        percent,
    })
}

/// `my_shares / shares_outstanding * 100`, for display.
pub fn ownership_percent(pair: &Pair, my_shares: u64) -> Result<Decimal, PricingError> {
    if pair.shares_outstanding == 0 {
        return Err(PricingError::NoLiquidity);
    }
    Ok(Decimal::from(my_shares) / Decimal::from(pair.shares_outstanding) * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pair::PairKey;
    use rust_decimal_macros::dec;

    fn pool(reserve1: u64, reserve2: u64, shares: u64) -> Pair {
        let mut pair = Pair::new(PairKey::new("A", "B"), "scid");
        pair.reserve1 = reserve1;
        pair.reserve2 = reserve2;
        pair.shares_outstanding = shares;
        pair
    }

    #[test]
    fn test_size_add_liquidity_keeps_ratio() {
        let pair = pool(100_000000, 50_000000, 100_000000);
        assert_eq!(size_add_liquidity(&pair, 10_000000, true).unwrap(), 5_000000);
        assert_eq!(size_add_liquidity(&pair, 5_000000, false).unwrap(), 10_000000);
        // 3 * 50 / 100 = 1.5 -> 1
        assert_eq!(size_add_liquidity(&pair, 3, true).unwrap(), 1);
    }

    #[test]
    fn test_first_deposit_needs_both_sides() {
        let pair = pool(0, 0, 0);
        assert_eq!(
            size_add_liquidity(&pair, 10, true),
            Err(PricingError::InitialDepositRequired)
        );
        let plan = AddLiquidityPlan::initial(10, 20);
        assert_eq!(plan.shares_minted, None);
    }

    #[test]
    fn test_shares_without_reserves_is_no_liquidity() {
        // decode anomaly: shares but no reserves
        let pair = pool(0, 0, 500);
        assert_eq!(size_add_liquidity(&pair, 10, true), Err(PricingError::NoLiquidity));
    }

    #[test]
    fn test_plan_add_liquidity() {
        let pair = pool(1000, 3000, 1000);
        let plan = plan_add_liquidity(&pair, 600, false).unwrap();
        assert_eq!((plan.amount1, plan.amount2), (200, 600));
        assert_eq!(plan.shares_minted, Some(200));
    }

    #[test]
    fn test_size_remove_liquidity() {
        // own 25% of 1000/2000
        let pair = pool(1000, 2000, 400);
        let plan = size_remove_liquidity(&pair, 100, RemovalPercent::new(dec!(50)).unwrap()).unwrap();
        assert_eq!((plan.owned1, plan.owned2), (250, 500));
        assert_eq!((plan.amount1, plan.amount2), (125, 250));
        assert_eq!(plan.shares_to_burn, 50);
    }

    #[test]
    fn test_size_remove_liquidity_floors() {
        let pair = pool(1001, 999, 3);
        let plan = size_remove_liquidity(&pair, 1, RemovalPercent::new(dec!(33)).unwrap()).unwrap();
        // owned = 1001/3 = 333, 999/3 = 333
        assert_eq!((plan.owned1, plan.owned2), (333, 333));
        // 333 * 0.33 = 109.89 -> 109
        assert_eq!((plan.amount1, plan.amount2), (109, 109));
        // 1 * 0.33 -> 0
        assert_eq!(plan.shares_to_burn, 0);
    }

    #[test]
    fn test_remove_liquidity_errors() {
        let empty = pool(0, 0, 0);
        assert_eq!(
            size_remove_liquidity(&empty, 10, RemovalPercent::full()),
            Err(PricingError::NoLiquidity)
        );
        let pair = pool(10, 10, 10);
        assert_eq!(
            size_remove_liquidity(&pair, 0, RemovalPercent::full()),
            Err(PricingError::NoShares)
        );
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let pair = pool(100_000000, 50_000000, 100_000000);
        let plan = plan_add_liquidity(&pair, 1_234567, true).unwrap();
        let minted = plan.shares_minted.unwrap();
        let after = pair.with_deposit(plan.amount1, plan.amount2, minted);

        let removal = size_remove_liquidity(&after, minted, RemovalPercent::full()).unwrap();
        assert!(plan.amount1.abs_diff(removal.amount1) <= 1);
        assert!(plan.amount2.abs_diff(removal.amount2) <= 1);
        assert_eq!(removal.shares_to_burn, minted);
    }

    #[test]
    fn test_ownership_percent() {
        let pair = pool(10, 10, 400);
        assert_eq!(ownership_percent(&pair, 100).unwrap(), dec!(25));
        assert_eq!(ownership_percent(&pool(0, 0, 0), 1), Err(PricingError::NoLiquidity));
    }
}
