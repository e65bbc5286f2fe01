use thiserror::Error;

/// A symbol or pair the caller named is not in the decoded registries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("token {0} is not registered")]
    TokenNotRegistered(String),

    #[error("pair {0} is not registered")]
    PairNotRegistered(String),

    #[error("trading pair {0} is not registered")]
    TradingPairNotRegistered(String),

    #[error("{symbol} is not a member of pair {pair}")]
    NotPairMember { symbol: String, pair: String },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
