use crate::error::{MathError, PricingError};
use crate::math::mul_div;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A fraction, e.g. a pool fee. `0.003` is 0.3%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub fn from_bps(bps: u64) -> Self {
        Self(Decimal::from(bps) / Decimal::from(10000))
    }

    /// The fraction expressed in percent (`0.003` -> `0.3`).
    pub fn as_percent(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }
}

/// Digits of a percentage kept by [`RemovalPercent`].
pub const PERCENT_DECIMALS: u32 = 7;
/// Denominator of a [`RemovalPercent`]: 100% with seven decimals.
pub const PERCENT_DENOMINATOR: u64 = 1_000_000_000;

/// Share of a liquidity position to withdraw, in (0, 100].
///
/// Held as an integer numerator over [`PERCENT_DENOMINATOR`] so that every
/// amount derived from it (shares burned, tokens withdrawn) goes through
/// [`mul_div`] and floors the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemovalPercent {
    parts: u64,
}

impl RemovalPercent {
    /// Validates and truncates a percentage to seven decimals.
    pub fn new(percent: Decimal) -> Result<Self, PricingError> {
        if percent <= Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(PricingError::InvalidPercent(percent.to_string()));
        }
        let parts = (percent * Decimal::from(10u64.pow(PERCENT_DECIMALS)))
            .trunc()
            .to_u64()
            .unwrap_or(0);
        if parts == 0 {
            return Err(PricingError::InvalidPercent(percent.to_string()));
        }
        Ok(Self { parts })
    }

    pub fn full() -> Self {
        Self {
            parts: PERCENT_DENOMINATOR,
        }
    }

    /// `floor(amount * percent / 100)`.
    pub fn apply(&self, amount: u64) -> Result<u64, MathError> {
        mul_div(amount, self.parts, PERCENT_DENOMINATOR)
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::try_from_i128_with_scale(i128::from(self.parts), PERCENT_DECIMALS)
            .unwrap_or_default()
    }
}
