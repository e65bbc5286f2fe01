//! Storage key layouts.
//!
//! Both registries and trading contracts pack several record kinds into one
//! flat key space, distinguished by a short prefix before the first `:`.

use cldex_domain::entities::PairKey;

/// A key of the bridge or swap registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryKey {
    /// `s:<SYMBOL>` -> token contract id (bridge registry).
    BridgeToken(String),
    /// `t:<SYMBOL>:c` -> token contract id (swap registry).
    TradableToken(String),
    /// `t:<SYMBOL>:d` -> token decimals (swap registry).
    TokenDecimals(String),
    /// `p:<A>:<B>` -> pool contract id.
    Pair(PairKey),
    /// `c:<A>:<B>` -> order-book contract id.
    TradingContract(PairKey),
    Other,
}

impl RegistryKey {
    pub fn parse(key: &str) -> Self {
        match key.split(':').collect::<Vec<_>>().as_slice() {
            ["s", symbol] if !symbol.is_empty() => Self::BridgeToken(symbol.to_string()),
            ["t", symbol, "c"] if !symbol.is_empty() => Self::TradableToken(symbol.to_string()),
            ["t", symbol, "d"] if !symbol.is_empty() => Self::TokenDecimals(symbol.to_string()),
            ["p", a, b] if !a.is_empty() && !b.is_empty() => Self::Pair(PairKey::new(*a, *b)),
            ["c", a, b] if !a.is_empty() && !b.is_empty() => {
                Self::TradingContract(PairKey::new(*a, *b))
            }
            _ => Self::Other,
        }
    }

    pub fn decimals_key(symbol: &str) -> String {
        format!("t:{symbol}:d")
    }

    pub fn trading_contract_key(pair: &PairKey) -> String {
        format!("c:{pair}")
    }
}

/// A key of an order-book contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKey {
    Fee,
    BuyRoot,
    SellRoot,
    Counter1,
    Counter2,
    History(u64),
    OrderPriceKey(u64),
    OrderRequested1(u64),
    OrderRequested2(u64),
    OrderFilled1(u64),
    OrderFilled2(u64),
    OrderSide(u64),
    OrderOwner(u64),
    /// `nk:<key>` -> scaled price shared by every order using `key`.
    Price(u64),
    Other,
}

impl TradeKey {
    /// Keys whose id suffix does not parse carry no attributable record and
    /// map to `Other`.
    pub fn parse(key: &str) -> Self {
        match key {
            "fee" => return Self::Fee,
            "buy" => return Self::BuyRoot,
            "sell" => return Self::SellRoot,
            "o1" => return Self::Counter1,
            "o2" => return Self::Counter2,
            _ => {}
        }
        let Some((tag, id)) = key.split_once(':') else {
            return Self::Other;
        };
        let Ok(id) = id.parse::<u64>() else {
            return Self::Other;
        };
        match tag {
            "h" => Self::History(id),
            "tn" => Self::OrderPriceKey(id),
            "to1" => Self::OrderRequested1(id),
            "to2" => Self::OrderRequested2(id),
            "tv1" => Self::OrderFilled1(id),
            "tv2" => Self::OrderFilled2(id),
            "tt" => Self::OrderSide(id),
            "ts" => Self::OrderOwner(id),
            "nk" => Self::Price(id),
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keys() {
        assert_eq!(
            RegistryKey::parse("s:DUSDT"),
            RegistryKey::BridgeToken("DUSDT".into())
        );
        assert_eq!(
            RegistryKey::parse("t:DERO:c"),
            RegistryKey::TradableToken("DERO".into())
        );
        assert_eq!(
            RegistryKey::parse("t:DERO:d"),
            RegistryKey::TokenDecimals("DERO".into())
        );
        assert_eq!(
            RegistryKey::parse("p:DERO:DUSDT"),
            RegistryKey::Pair(PairKey::new("DERO", "DUSDT"))
        );
        assert_eq!(
            RegistryKey::parse("c:DERO:DUSDT"),
            RegistryKey::TradingContract(PairKey::new("DERO", "DUSDT"))
        );
        assert_eq!(RegistryKey::parse("t:DERO:x"), RegistryKey::Other);
        assert_eq!(RegistryKey::parse("p:DERO"), RegistryKey::Other);
        assert_eq!(RegistryKey::parse("owner"), RegistryKey::Other);
    }

    #[test]
    fn test_trade_keys() {
        assert_eq!(TradeKey::parse("fee"), TradeKey::Fee);
        assert_eq!(TradeKey::parse("to1:7"), TradeKey::OrderRequested1(7));
        assert_eq!(TradeKey::parse("tv2:7"), TradeKey::OrderFilled2(7));
        assert_eq!(TradeKey::parse("nk:3"), TradeKey::Price(3));
        assert_eq!(TradeKey::parse("h:12"), TradeKey::History(12));
        assert_eq!(TradeKey::parse("tt:x"), TradeKey::Other);
        assert_eq!(TradeKey::parse("zz:1"), TradeKey::Other);
    }
}
