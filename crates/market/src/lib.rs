//! Derived market views over a decoded snapshot.
//!
//! - [`router`]: exchange-rate graph and multi-hop conversion.
//! - [`valuation`]: per-pair liquidity overview and total locked value.
//! - [`book`]: aggregated order book, open orders and trade history.

pub mod book;
pub mod error;
pub mod router;
pub mod valuation;

pub use book::{OpenOrder, OrderBook, PriceLevel};
pub use error::RouteError;
pub use router::{Conversion, ExchangeGraph};
pub use valuation::{LockedValue, PairOverview};
