use crate::error::SnapshotError;
use crate::value::{ContractVars, StorageValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Read access to contract storage and the wallet's balances.
pub trait StateSource {
    /// Full storage of `contract`, or `None` when it cannot be read.
    fn fetch_vars(&self, contract: &str) -> Option<ContractVars>;

    /// The wallet's balance of the asset issued by `contract`. The empty id
    /// is the native asset.
    fn balance(&self, contract: &str) -> Option<u64>;

    fn fetch_var(&self, contract: &str, key: &str) -> Option<StorageValue> {
        self.fetch_vars(contract)?.remove(key)
    }
}

/// Chain heights shown in the status prompt.
pub trait HeightSource {
    fn daemon_height(&self) -> Option<u64>;
    fn wallet_height(&self) -> Option<u64>;
}

/// Contract storage captured at one point in time.
///
/// Loaded from a JSON document of the form
/// `{"contracts": {"<id>": {"<key>": <value>}}, "balances": {...},
/// "public_key": "...", "daemon_height": n, "wallet_height": n}`
/// or assembled in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSource {
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractVars>,
    #[serde(default)]
    pub balances: BTreeMap<String, u64>,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub daemon_height: Option<u64>,
    #[serde(default)]
    pub wallet_height: Option<u64>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            contracts = snapshot.contracts.len(),
            "Loaded contract snapshot"
        );
        Ok(snapshot)
    }

    #[must_use]
    pub fn with_var(
        mut self,
        contract: &str,
        key: &str,
        value: impl Into<StorageValue>,
    ) -> Self {
        self.contracts
            .entry(contract.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_balance(mut self, contract: &str, amount: u64) -> Self {
        self.balances.insert(contract.to_string(), amount);
        self
    }

    #[must_use]
    pub fn with_heights(mut self, daemon: u64, wallet: u64) -> Self {
        self.daemon_height = Some(daemon);
        self.wallet_height = Some(wallet);
        self
    }
}

impl StateSource for SnapshotSource {
    fn fetch_vars(&self, contract: &str) -> Option<ContractVars> {
        self.contracts.get(contract).cloned()
    }

    fn balance(&self, contract: &str) -> Option<u64> {
        self.balances.get(contract).copied()
    }

    fn fetch_var(&self, contract: &str, key: &str) -> Option<StorageValue> {
        self.contracts.get(contract)?.get(key).cloned()
    }
}

impl HeightSource for SnapshotSource {
    fn daemon_height(&self) -> Option<u64> {
        self.daemon_height
    }

    fn wallet_height(&self) -> Option<u64> {
        self.wallet_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"contracts": {{"abc": {{"fee": 30, "name": "706f6f6c"}}}},
                "balances": {{"": 1000}},
                "daemon_height": 12, "wallet_height": 11}}"#
        )
        .unwrap();

        let source = SnapshotSource::from_json_file(file.path()).unwrap();
        assert_eq!(source.fetch_var("abc", "fee").unwrap().as_u64(), 30);
        assert_eq!(source.balance(""), Some(1000));
        assert_eq!(source.balance("abc"), None);
        assert_eq!(source.daemon_height(), Some(12));
        assert_eq!(source.wallet_height(), Some(11));
        assert!(source.public_key.is_empty());
    }

    #[test]
    fn test_malformed_snapshot() {
        let err = SnapshotSource::from_json_str("{\"contracts\": 3}").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));

        let err = SnapshotSource::from_json_file("/nonexistent/snapshot.json").unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }

    #[test]
    fn test_builder() {
        let source = SnapshotSource::new()
            .with_var("c", "k", 5u64)
            .with_balance("c", 9)
            .with_heights(3, 2);
        assert_eq!(source.fetch_vars("c").unwrap().len(), 1);
        assert_eq!(source.fetch_vars("missing"), None);
        assert_eq!(source.balance("c"), Some(9));
    }
}
