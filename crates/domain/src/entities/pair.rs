use crate::value_objects::percentage::Percentage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordered `(symbolA, symbolB)` key of a pair, written `A:B`.
///
/// Order is significant: a pair registered as `A:B` is not found as `B:A`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub base: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pair '{0}', expected <SYMBOL>:<SYMBOL>")]
pub struct PairKeyError(pub String);

impl PairKey {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

/// Parses user input; symbols are upper-cased, as registries store them.
impl FromStr for PairKey {
    type Err = PairKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split(':').collect::<Vec<_>>().as_slice() {
            [base, quote] if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base.to_uppercase(), quote.to_uppercase()))
            }
            _ => Err(PairKeyError(s.to_string())),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.base, self.quote)
    }
}

/// A constant-product liquidity pool between two tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub key: PairKey,
    pub contract_id: String,
    /// Parts per 10000 taken from the swap output.
    pub fee_bps: u64,
    pub reserve1: u64,
    pub reserve2: u64,
    pub shares_outstanding: u64,
    pub adds: u64,
    pub removals: u64,
    pub swaps: u64,
}

impl Pair {
    pub fn new(key: PairKey, contract_id: impl Into<String>) -> Self {
        Self {
            key,
            contract_id: contract_id.into(),
            fee_bps: 0,
            reserve1: 0,
            reserve2: 0,
            shares_outstanding: 0,
            adds: 0,
            removals: 0,
            swaps: 0,
        }
    }

    /// Both reserves are non-zero, so spot prices and swaps are defined.
    pub fn has_liquidity(&self) -> bool {
        self.reserve1 > 0 && self.reserve2 > 0
    }

    /// `(reserve_in, reserve_out)` for a swap in the given direction.
    pub fn reserves(&self, input_is_token1: bool) -> (u64, u64) {
        if input_is_token1 {
            (self.reserve1, self.reserve2)
        } else {
            (self.reserve2, self.reserve1)
        }
    }

    pub fn fee(&self) -> Percentage {
        Percentage::from_bps(self.fee_bps)
    }

    /// Pool state after a deposit that minted `shares` new shares.
    #[must_use]
    pub fn with_deposit(&self, amount1: u64, amount2: u64, shares: u64) -> Self {
        Self {
            reserve1: self.reserve1.saturating_add(amount1),
            reserve2: self.reserve2.saturating_add(amount2),
            shares_outstanding: self.shares_outstanding.saturating_add(shares),
            adds: self.adds.saturating_add(1),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_parse() {
        let key: PairKey = "DERO:DUSDT".parse().unwrap();
        assert_eq!(key, PairKey::new("DERO", "DUSDT"));
        assert_eq!(key.to_string(), "DERO:DUSDT");
        assert_eq!("dero:dUSDT".parse::<PairKey>().unwrap(), key);

        assert!("DERO".parse::<PairKey>().is_err());
        assert!("A:B:C".parse::<PairKey>().is_err());
        assert!(":B".parse::<PairKey>().is_err());
    }

    #[test]
    fn test_reserves_direction() {
        let mut pair = Pair::new(PairKey::new("A", "B"), "scid");
        pair.reserve1 = 10;
        pair.reserve2 = 20;
        assert_eq!(pair.reserves(true), (10, 20));
        assert_eq!(pair.reserves(false), (20, 10));
        assert!(pair.has_liquidity());

        let deposited = pair.with_deposit(1, 2, 3);
        assert_eq!(
            (deposited.reserve1, deposited.reserve2, deposited.shares_outstanding),
            (11, 22, 3)
        );
    }
}
