use crate::error::MathError;
use primitive_types::U256;

/// Computes `floor(a * b / c)` through a 256-bit intermediate.
///
/// The product of two `u64` values always fits, so the only failures are a
/// zero divisor and a quotient that does not fit back into 64 bits. Callers
/// are expected to rule out `c == 0` (empty pools, no outstanding shares)
/// before reaching this point and report it as a liquidity condition.
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64, MathError> {
    let quotient = mul_div_wide(U256::from(a), U256::from(b), U256::from(c))?;
    narrow(quotient)
}

/// Same as [`mul_div`] on 256-bit operands, used where a sum of two `u64`
/// values appears in the divisor.
pub fn mul_div_wide(a: U256, b: U256, c: U256) -> Result<U256, MathError> {
    if c.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    Ok(product / c)
}

/// Narrows a 256-bit value to `u64`.
pub fn narrow(value: U256) -> Result<u64, MathError> {
    if value > U256::from(u64::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(value.as_u64())
}

/// Returns `10^exp` when it fits in 64 bits.
pub fn pow10(exp: u32) -> Option<u64> {
    10u64.checked_pow(exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_floors() {
        // 7 * 3 / 2 = 10.5 -> 10
        assert_eq!(mul_div(7, 3, 2).unwrap(), 10);
        assert_eq!(mul_div(0, 123, 7).unwrap(), 0);
        assert_eq!(mul_div(1, 1, 3).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_near_max() {
        assert_eq!(mul_div(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
        assert_eq!(mul_div(u64::MAX, 2, 2).unwrap(), u64::MAX);
        assert_eq!(mul_div(u64::MAX, u64::MAX - 1, u64::MAX).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0), Err(MathError::DivisionByZero));
        assert_eq!(mul_div(u64::MAX, 3, 2), Err(MathError::Overflow));
    }

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0), Some(1));
        assert_eq!(pow10(7), Some(10_000_000));
        assert_eq!(pow10(19), Some(10_000_000_000_000_000_000));
        assert_eq!(pow10(20), None);
    }
}
