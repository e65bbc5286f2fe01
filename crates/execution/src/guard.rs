//! Advisory policy guards.
//!
//! The engine computes these checks; the caller decides to stop. Every
//! planner operation runs the relevant guards before returning a call.

use crate::error::PolicyError;
use cldex_domain::entities::Token;
use cldex_domain::math::constant_product::SwapQuote;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Decimals the native asset is displayed with; bridge fees are paid in it.
pub const NATIVE_DECIMALS: u8 = 5;

/// Configuration for the policy guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Swaps above this slippage percentage are refused.
    pub max_slippage_pct: f64,
    /// Symbol of the network's native asset.
    pub native_symbol: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_slippage_pct: 40.0,
            native_symbol: "DERO".to_string(),
        }
    }
}

impl GuardConfig {
    pub fn check_slippage(&self, quote: &SwapQuote) -> Result<(), PolicyError> {
        if quote.slippage_pct > self.max_slippage_pct {
            warn!(
                slippage_pct = quote.slippage_pct,
                max_pct = self.max_slippage_pct,
                "Swap refused"
            );
            return Err(PolicyError::SlippageExceeded {
                slippage_pct: quote.slippage_pct,
                max_pct: self.max_slippage_pct,
            });
        }
        Ok(())
    }

    pub fn check_balance(
        &self,
        symbol: &str,
        required: u64,
        available: u64,
    ) -> Result<(), PolicyError> {
        if required > available {
            return Err(PolicyError::InsufficientBalance {
                symbol: symbol.to_string(),
                required,
                available,
            });
        }
        Ok(())
    }

    pub fn check_positive(&self, amount: u64) -> Result<(), PolicyError> {
        if amount == 0 {
            return Err(PolicyError::ZeroAmount);
        }
        Ok(())
    }

    pub fn check_bridgeable(&self, token: &Token) -> Result<(), PolicyError> {
        if token.is_native() || token.symbol == self.native_symbol {
            return Err(PolicyError::NativeAssetNotBridgeable(token.symbol.clone()));
        }
        if !token.bridgeable {
            return Err(PolicyError::NotBridgeable(token.symbol.clone()));
        }
        Ok(())
    }

    /// Accepts `0x` followed by 40 hex digits whose letters mix upper and
    /// lower case, the checksummed form. Single-case addresses are refused.
    pub fn check_eth_address(&self, address: &str) -> Result<(), PolicyError> {
        let invalid = || PolicyError::InvalidEthAddress(address.to_string());
        let digits = address.strip_prefix("0x").ok_or_else(invalid)?;
        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if !(has_lower && has_upper) {
            return Err(invalid());
        }
        Ok(())
    }
}
