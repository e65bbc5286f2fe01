use crate::error::MathError;
use crate::math::fixed_point::{mul_div_wide, narrow, pow10};
use crate::value_objects::price::{PRICE_SCALE, ScaledPrice};
use primitive_types::U256;

/// Token2 base units a buy order must escrow for `amount1` base units of
/// token1 at `price`.
///
/// `floor(amount1 * price * 10^d2 / (10^d1 * PRICE_SCALE)) + 1`; the extra unit
/// covers the truncation so the order is never underfunded.
pub fn buy_order_funding(
    amount1: u64,
    price: ScaledPrice,
    decimals1: u8,
    decimals2: u8,
) -> Result<u64, MathError> {
    let scale1 = pow10(u32::from(decimals1)).ok_or(MathError::Overflow)?;
    let scale2 = pow10(u32::from(decimals2)).ok_or(MathError::Overflow)?;

    let notional = U256::from(amount1)
        .checked_mul(U256::from(price.0))
        .ok_or(MathError::Overflow)?;
    let denominator = U256::from(scale1) * U256::from(PRICE_SCALE);
    let funding = narrow(mul_div_wide(notional, U256::from(scale2), denominator)?)?;

    funding.checked_add(1).ok_or(MathError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_order_funding() {
        // 2.0 token1 (5 decimals) @ 1.5 -> 3.0 token2 (6 decimals) + 1 unit
        let funding = buy_order_funding(200_000, ScaledPrice(15_000_000), 5, 6).unwrap();
        assert_eq!(funding, 3_000_001);
    }

    #[test]
    fn test_buy_order_funding_truncates_then_pads() {
        // 1 base unit @ 0.3333333 with equal decimals -> 0.33 -> 0 + 1
        let funding = buy_order_funding(1, ScaledPrice(3_333_333), 5, 5).unwrap();
        assert_eq!(funding, 1);
    }
}
