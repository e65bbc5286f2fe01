use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a resting limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Reads the side tag stored by the trading contract. Only `"sell"` marks
    /// an ask; every other tag rests on the bid side.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "sell" { Self::Sell } else { Self::Buy }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network the client is attached to; only shown in the status prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("MAINNET"),
            Self::Testnet => f.write_str("TESTNET"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_side_from_tag() {
        assert_eq!(OrderSide::from_tag("sell"), OrderSide::Sell);
        assert_eq!(OrderSide::from_tag("buy"), OrderSide::Buy);
        assert_eq!(OrderSide::from_tag(""), OrderSide::Buy);
    }
}
