use crate::error::AmountError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale applied to order-book prices and exchange-rate graph edges.
pub const PRICE_SCALE: u64 = 10_000_000;
const PRICE_DECIMALS: u32 = 7;

/// Price of one unit of token1 in token2, multiplied by [`PRICE_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ScaledPrice(pub u64);

impl ScaledPrice {
    pub fn new(scaled: u64) -> Self {
        Self(scaled)
    }

    /// Converts a display price, truncating below the seventh decimal.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value.to_string()));
        }
        let scaled = value
            .checked_mul(Decimal::from(PRICE_SCALE))
            .and_then(|v| v.trunc().to_u64())
            .ok_or_else(|| AmountError::Overflow(value.to_string()))?;
        Ok(Self(scaled))
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::try_from_i128_with_scale(i128::from(self.0), PRICE_DECIMALS).unwrap_or_default()
    }
}

impl fmt::Display for ScaledPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
