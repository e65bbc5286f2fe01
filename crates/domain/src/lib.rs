//! Domain model and exact arithmetic for the cldex engine.
//!
//! This crate holds the typed snapshot models decoded from contract storage
//! (tokens, AMM pairs, limit orders, trade history) together with the
//! fixed-point and constant-product math every money computation goes
//! through. Everything here is pure: no I/O, no shared state.

/// Typed records decoded from contract storage.
pub mod entities;
/// Small enumerations shared across crates.
pub mod enums;
/// Error types.
pub mod error;
/// Fixed-point, constant-product and liquidity math.
pub mod math;
/// Amount, price and percentage value objects.
pub mod value_objects;

pub use error::{AmountError, MathError, PricingError};
