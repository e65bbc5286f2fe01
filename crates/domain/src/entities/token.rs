use crate::value_objects::amount::Amount;
use serde::{Deserialize, Serialize};

/// A fungible asset known to the exchange.
///
/// `index` is assigned in first-seen order during a decode pass and doubles
/// as the token's vertex id in the exchange-rate graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub symbol: String,
    /// Issuing contract; empty (or the all-zero id) for the native asset.
    pub contract_id: String,
    pub decimals: u8,
    /// Flat fee, in native-asset base units, charged for bridging out.
    pub bridge_fee: u64,
    pub bridgeable: bool,
    pub tradable: bool,
}

impl Token {
    pub fn new(
        index: usize,
        symbol: impl Into<String>,
        contract_id: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            index,
            symbol: symbol.into(),
            contract_id: contract_id.into(),
            decimals,
            bridge_fee: 0,
            bridgeable: false,
            tradable: false,
        }
    }

    pub fn is_native(&self) -> bool {
        self.contract_id.bytes().all(|b| b == b'0')
    }

    /// Wraps a base-unit quantity of this token.
    pub fn amount(&self, raw: u64) -> Amount {
        Amount::new(raw, self.decimals)
    }
}
