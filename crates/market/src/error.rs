use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("token {0} is not registered")]
    UnknownToken(String),

    /// Both tokens exist but no chain of funded pools connects them.
    #[error("no conversion path from {from} to {to}")]
    NoPath { from: String, to: String },

    #[error("compounded rate overflowed")]
    Overflow,
}
