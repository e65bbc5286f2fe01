//! Error types for the domain crate.

use thiserror::Error;

/// Failures of the fixed-point utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// The divisor was zero.
    #[error("division by zero")]
    DivisionByZero,
    /// The result does not fit in 64 bits.
    #[error("result overflows u64")]
    Overflow,
}

/// Failures of the AMM pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The pool has no reserves or no outstanding shares.
    #[error("pair has no liquidity")]
    NoLiquidity,
    /// First deposit into an empty pool: the other side must be supplied by the caller.
    #[error("pair has no outstanding shares; the initial deposit ratio must be supplied")]
    InitialDepositRequired,
    /// Removal percentage outside (0, 100].
    #[error("percentage must be > 0 and <= 100, got {0}")]
    InvalidPercent(String),
    /// The account owns no shares of the pool.
    #[error("no shares owned")]
    NoShares,
    /// Arithmetic failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Failures converting a display amount into base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The text is not a decimal number.
    #[error("cannot parse amount '{0}'")]
    Invalid(String),
    /// Amount is zero or negative.
    #[error("amount must be > 0, got '{0}'")]
    NotPositive(String),
    /// The scaled amount does not fit in 64 bits.
    #[error("amount '{0}' overflows base units")]
    Overflow(String),
    /// More decimal places than the arithmetic can represent.
    #[error("unsupported decimal scale {0}")]
    Scale(u32),
}
