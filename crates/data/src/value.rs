use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full storage of one contract, keyed by storage key.
///
/// Ordered so that decode passes are deterministic.
pub type ContractVars = BTreeMap<String, StorageValue>;

/// A single storage value. Contracts store either integers or strings, and
/// some strings are hex-encoded text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageValue {
    Uint(u64),
    Text(String),
    /// Anything else the node returned (floats, negatives, nulls).
    Other(serde_json::Value),
}

impl StorageValue {
    /// Numeric view. Unparsable or out-of-range values read as zero.
    pub fn as_u64(&self) -> u64 {
        match self {
            Self::Uint(v) => *v,
            Self::Text(s) => parse_u64_or_zero(s),
            Self::Other(value) => value
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map_or(0, |f| f as u64),
        }
    }

    /// The string exactly as stored.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The string with hex encoding removed. Text that is not valid hex of
    /// UTF-8 is returned unchanged.
    pub fn decoded_text(&self) -> Option<String> {
        self.raw_text().map(decode_hex_text)
    }
}

impl From<u64> for StorageValue {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<&str> for StorageValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub fn parse_u64_or_zero(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}

pub fn decode_hex_text(text: &str) -> String {
    hex::decode(text)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| text.to_string())
}
