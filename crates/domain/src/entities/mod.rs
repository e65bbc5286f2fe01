pub mod order;
pub mod pair;
pub mod token;
pub mod trading_pair;

// Re-export for easier access
pub use order::{Order, TradeHistoryEntry};
pub use pair::{Pair, PairKey, PairKeyError};
pub use token::Token;
pub use trading_pair::TradingPairState;
