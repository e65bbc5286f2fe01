use crate::entities::pair::Pair;
use crate::error::{MathError, PricingError};
use crate::math::fixed_point::{mul_div, mul_div_wide, narrow};
use crate::value_objects::amount::Amount;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Denominator of `Pair::fee_bps`.
pub const FEE_DENOMINATOR: u64 = 10_000;

/// Result of quoting a swap against a pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub input_is_token1: bool,
    pub amount_in: u64,
    /// Output before the pool fee is taken.
    pub raw_out: u64,
    /// Output after the fee; what the trader receives.
    pub amount_out: u64,
    /// Cosmetic risk indicator in percent. Never used for settlement.
    pub slippage_pct: f64,
}

/// Quotes swapping `amount_in` base units into `pair`.
pub fn quote_swap(
    pair: &Pair,
    input_is_token1: bool,
    amount_in: u64,
) -> Result<SwapQuote, PricingError> {
    let (reserve_in, reserve_out) = pair.reserves(input_is_token1);
    let (raw_out, amount_out) =
        calculate_out_amount(amount_in, reserve_in, reserve_out, pair.fee_bps)?;

    Ok(SwapQuote {
        input_is_token1,
        amount_in,
        raw_out,
        amount_out,
        slippage_pct: slippage_percent(amount_in, reserve_in),
    })
}

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
/// returns (raw_output, output_after_fee)
///
/// formula: raw = dx * y / (x + dx)
/// the fee is taken from the output side: out = raw * (10000 - fee) / 10000
pub fn calculate_out_amount(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u64,
) -> Result<(u64, u64), PricingError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(PricingError::NoLiquidity);
    }
    if amount_in == 0 {
        return Ok((0, 0));
    }

    // reserve_in + amount_in may exceed u64
    let denominator = U256::from(reserve_in) + U256::from(amount_in);
    let raw_out = narrow(mul_div_wide(
        U256::from(amount_in),
        U256::from(reserve_out),
        denominator,
    )?)?;
    let amount_out = mul_div(
        raw_out,
        FEE_DENOMINATOR.saturating_sub(fee_bps),
        FEE_DENOMINATOR,
    )?;

    Ok((raw_out, amount_out))
}

/// `100 - 100 / (1 + in / reserve_in)`, in percent.
pub fn slippage_percent(amount_in: u64, reserve_in: u64) -> f64 {
    if reserve_in == 0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + amount_in as f64 / reserve_in as f64)
}

/// Calculates the spot price of one display unit of the input token in
/// display units of the output token.
/// Price = reserve_out / reserve_in
pub fn calculate_spot_price(reserve_in: Amount, reserve_out: Amount) -> Result<Decimal, PricingError> {
    let r_in = reserve_in.to_decimal();
    if r_in.is_zero() {
        return Err(PricingError::NoLiquidity);
    }
    reserve_out
        .to_decimal()
        .checked_div(r_in)
        .ok_or(PricingError::Math(MathError::Overflow))
}

/// Calculates the constant product K
pub fn calculate_k(reserve1: u64, reserve2: u64) -> U256 {
    U256::from(reserve1) * U256::from(reserve2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pair::PairKey;
    use rust_decimal_macros::dec;

    fn pool(reserve1: u64, reserve2: u64, fee_bps: u64) -> Pair {
        let mut pair = Pair::new(PairKey::new("A", "B"), "scid");
        pair.reserve1 = reserve1;
        pair.reserve2 = reserve2;
        pair.shares_outstanding = reserve1;
        pair.fee_bps = fee_bps;
        pair
    }

    #[test]
    fn test_calculate_out_amount() {
        // 1000 reserve0, 1000 reserve1, 10 input, 0.3% fee (30 bps)
        // raw = 10 * 1000 / 1010 = 9.90 -> 9
        // out = 9 * 9970 / 10000 = 8.97 -> 8
        let (raw, out) = calculate_out_amount(10, 1000, 1000, 30).unwrap();
        assert_eq!(raw, 9);
        assert_eq!(out, 8);
    }

    #[test]
    fn test_quote_swap_reference_values() {
        // reserves 100 / 50 at 6 decimals, 1.0 in
        // raw = 1_000000 * 50_000000 / 101_000000 = 495049.50 -> 495049
        // out = 495049 * 9970 / 10000 = 493563.85 -> 493563
        let pair = pool(100_000000, 50_000000, 30);
        let quote = quote_swap(&pair, true, 1_000000).unwrap();
        assert_eq!(quote.raw_out, 495_049);
        assert_eq!(quote.amount_out, 493_563);
        assert!((quote.slippage_pct - 0.990099).abs() < 1e-5);

        let reverse = quote_swap(&pair, false, 1_000000).unwrap();
        // raw = 1_000000 * 100_000000 / 51_000000 = 1960784.31 -> 1960784
        assert_eq!(reverse.raw_out, 1_960_784);
        assert_eq!(reverse.amount_out, 1_954_901);
    }

    #[test]
    fn test_swap_without_liquidity() {
        let pair = pool(0, 0, 30);
        assert_eq!(quote_swap(&pair, true, 10), Err(PricingError::NoLiquidity));
    }

    #[test]
    fn test_swap_zero_input() {
        let pair = pool(1000, 1000, 30);
        let quote = quote_swap(&pair, true, 0).unwrap();
        assert_eq!(quote.amount_out, 0);
        assert_eq!(quote.slippage_pct, 0.0);
    }

    #[test]
    fn test_swap_huge_input_stays_below_reserve() {
        let pair = pool(u64::MAX, u64::MAX, 0);
        let quote = quote_swap(&pair, true, u64::MAX).unwrap();
        assert!(quote.amount_out < u64::MAX);
        assert!((quote.slippage_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_spot_price() {
        let r0 = Amount::new(2000, 0);
        let r1 = Amount::new(1000, 0);

        let price = calculate_spot_price(r0, r1).unwrap();
        // price = 1000 / 2000 = 0.5
        assert_eq!(price, dec!(0.5));

        // decimals are applied before dividing: 2.0 A vs 1.0 B
        let price = calculate_spot_price(Amount::new(200_000, 5), Amount::new(1_000_000, 6)).unwrap();
        assert_eq!(price, dec!(0.5));

        assert!(calculate_spot_price(Amount::zero(5), r1).is_err());
    }
}
