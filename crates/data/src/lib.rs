//! Contract-state access and decoding for the exchange client.
//!
//! Contract storage arrives as flat key/value maps. This crate turns those
//! maps into the domain model: token and pair registries, pool reserves and
//! the raw state of order-book contracts.

pub mod config;
pub mod decoder;
pub mod error;
pub mod keys;
pub mod registry;
pub mod source;
pub mod value;

pub use config::RegistryConfig;
pub use decoder::SnapshotDecoder;
pub use error::{LookupError, SnapshotError};
pub use registry::{MarketSnapshot, PairRegistry, TokenRegistry};
pub use source::{HeightSource, SnapshotSource, StateSource};
pub use value::{ContractVars, StorageValue};
