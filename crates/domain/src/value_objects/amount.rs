use crate::error::AmountError;
use crate::math::fixed_point::pow10;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A token quantity in integer base units together with its display scale.
///
/// Settlement amounts stay in `raw` end to end. The decimal view is exact
/// (`raw / 10^decimals` as a `Decimal`), so it is safe to use beyond display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub raw: u64,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: u64, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self { raw: 0, decimals }
    }

    /// Parses a human amount such as `"12.5"` into base units.
    ///
    /// Digits beyond `decimals` are truncated toward zero. Zero, negative and
    /// unparsable inputs are rejected.
    pub fn parse(text: &str, decimals: u8) -> Result<Self, AmountError> {
        let value =
            Decimal::from_str(text.trim()).map_err(|_| AmountError::Invalid(text.to_string()))?;
        Self::from_decimal(value, decimals)
    }

    /// Converts a display value into base units, truncating extra digits.
    pub fn from_decimal(value: Decimal, decimals: u8) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value.to_string()));
        }
        let scale = u32::from(decimals);
        let multiplier = pow10(scale).ok_or(AmountError::Scale(scale))?;
        let scaled = value
            .checked_mul(Decimal::from(multiplier))
            .ok_or_else(|| AmountError::Overflow(value.to_string()))?;
        let raw = scaled
            .trunc()
            .to_u64()
            .ok_or_else(|| AmountError::Overflow(value.to_string()))?;
        if raw == 0 {
            return Err(AmountError::NotPositive(value.to_string()));
        }
        Ok(Self { raw, decimals })
    }

    /// Exact display value. Scales above 28 are not representable and read as zero.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::try_from_i128_with_scale(i128::from(self.raw), u32::from(self.decimals))
            .unwrap_or_default()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
