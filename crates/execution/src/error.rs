use cldex_data::LookupError;
use cldex_domain::{AmountError, MathError, PricingError};
use thiserror::Error;

/// An operation was sized but must not be submitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("slippage {slippage_pct:.3}% exceeds the {max_pct}% limit")]
    SlippageExceeded { slippage_pct: f64, max_pct: f64 },

    #[error("insufficient {symbol} balance: need {required}, have {available}")]
    InsufficientBalance {
        symbol: String,
        required: u64,
        available: u64,
    },

    #[error("{0} is the native asset and cannot be bridged")]
    NativeAssetNotBridgeable(String),

    #[error("{0} is not bridgeable")]
    NotBridgeable(String),

    #[error("invalid ethereum address '{0}', expected a mixed-case 0x address")]
    InvalidEthAddress(String),

    #[error("amount must be greater than zero")]
    ZeroAmount,
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("token {0} is already registered")]
    AlreadyRegistered(String),

    #[error("contract {0} does not describe a token")]
    NotATokenContract(String),

    #[error("destination address is empty")]
    MissingDestination,
}

impl From<MathError> for ExecutionError {
    fn from(err: MathError) -> Self {
        Self::Pricing(PricingError::Math(err))
    }
}
