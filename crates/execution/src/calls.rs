//! Contract call and transfer descriptions.
//!
//! Nothing here signs or submits. A call names the entrypoint, the assets
//! deposited into the contract with it and its typed arguments; the wallet
//! collaborator encodes and sends it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entrypoint {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    Buy,
    Sell,
    Cancel,
    Bridge,
    RegisterToken,
    RegisterPair,
}

impl Entrypoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swap => "Swap",
            Self::AddLiquidity => "AddLiquidity",
            Self::RemoveLiquidity => "RemoveLiquidity",
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Cancel => "Cancel",
            Self::Bridge => "Bridge",
            Self::RegisterToken => "RegisterToken",
            Self::RegisterPair => "RegisterPair",
        }
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assets sent into the called contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransfer {
    /// Asset contract id; empty for the native asset.
    pub asset: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Uint(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallArg {
    pub name: String,
    pub value: ArgValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract: String,
    pub entrypoint: Entrypoint,
    pub transfers: Vec<AssetTransfer>,
    pub args: Vec<CallArg>,
}

impl ContractCall {
    pub fn new(contract: impl Into<String>, entrypoint: Entrypoint) -> Self {
        Self {
            contract: contract.into(),
            entrypoint,
            transfers: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Deposits `amount` of `asset` with the call. An all-zero asset id is
    /// normalised to the native asset.
    #[must_use]
    pub fn with_transfer(mut self, asset: &str, amount: u64) -> Self {
        self.transfers.push(AssetTransfer {
            asset: native_normalized(asset),
            amount,
        });
        self
    }

    #[must_use]
    pub fn with_uint(mut self, name: &str, value: u64) -> Self {
        self.args.push(CallArg {
            name: name.to_string(),
            value: ArgValue::Uint(value),
        });
        self
    }

    #[must_use]
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push(CallArg {
            name: name.to_string(),
            value: ArgValue::Text(value.into()),
        });
        self
    }

    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// Total deposited of `asset`.
    pub fn deposited(&self, asset: &str) -> u64 {
        let asset = native_normalized(asset);
        self.transfers
            .iter()
            .filter(|t| t.asset == asset)
            .map(|t| t.amount)
            .sum()
    }
}

/// A plain wallet-to-wallet transfer, no entrypoint involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainTransfer {
    pub asset: String,
    pub destination: String,
    pub amount: u64,
}

impl PlainTransfer {
    pub fn new(asset: &str, destination: impl Into<String>, amount: u64) -> Self {
        Self {
            asset: native_normalized(asset),
            destination: destination.into(),
            amount,
        }
    }
}

fn native_normalized(asset: &str) -> String {
    if asset.bytes().all(|b| b == b'0') {
        String::new()
    } else {
        asset.to_string()
    }
}
