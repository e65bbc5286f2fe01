use crate::error::LookupError;
use cldex_domain::entities::{Pair, PairKey, Token};
use std::collections::BTreeMap;

/// Tokens by symbol, with indices assigned in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    by_symbol: BTreeMap<String, Token>,
    symbols: Vec<String>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `symbol` under the next free index. An already known symbol
    /// is left untouched and its entry returned.
    pub fn insert(&mut self, symbol: &str, contract_id: &str, decimals: u8) -> &mut Token {
        let index = self.symbols.len();
        let symbols = &mut self.symbols;
        self.by_symbol
            .entry(symbol.to_string())
            .or_insert_with(|| {
                symbols.push(symbol.to_string());
                Token::new(index, symbol, contract_id, decimals)
            })
    }

    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.by_symbol.get(symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Token> {
        self.by_symbol.get_mut(symbol)
    }

    pub fn require(&self, symbol: &str) -> Result<&Token, LookupError> {
        self.get(symbol)
            .ok_or_else(|| LookupError::TokenNotRegistered(symbol.to_string()))
    }

    pub fn by_index(&self, index: usize) -> Option<&Token> {
        self.symbols.get(index).and_then(|s| self.by_symbol.get(s))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Tokens in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.symbols.iter().filter_map(|s| self.by_symbol.get(s))
    }
}

/// Liquidity pools by ordered pair key.
#[derive(Debug, Clone, Default)]
pub struct PairRegistry {
    pairs: BTreeMap<PairKey, Pair>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: Pair) {
        self.pairs.insert(pair.key.clone(), pair);
    }

    pub fn get(&self, key: &PairKey) -> Option<&Pair> {
        self.pairs.get(key)
    }

    pub fn require(&self, key: &PairKey) -> Result<&Pair, LookupError> {
        self.get(key)
            .ok_or_else(|| LookupError::PairNotRegistered(key.to_string()))
    }

    /// Finds the pool for two symbols in either order. Returns the pool and
    /// whether `from` is its first token.
    pub fn find_between(&self, from: &str, to: &str) -> Option<(&Pair, bool)> {
        if let Some(pair) = self.pairs.get(&PairKey::new(from, to)) {
            return Some((pair, true));
        }
        self.pairs.get(&PairKey::new(to, from)).map(|pair| (pair, false))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }
}

/// Everything one decode pass produces.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub tokens: TokenRegistry,
    pub pairs: PairRegistry,
    /// Order-book contract ids by pair.
    pub trading_contracts: BTreeMap<PairKey, String>,
}

impl MarketSnapshot {
    /// Both tokens of a registered pool, in pool order.
    pub fn pair_tokens(&self, key: &PairKey) -> Result<(&Token, &Token), LookupError> {
        Ok((self.tokens.require(&key.base)?, self.tokens.require(&key.quote)?))
    }

    /// Whether `symbol` is the first token of `key`.
    pub fn is_first_member(&self, key: &PairKey, symbol: &str) -> Result<bool, LookupError> {
        if key.base == symbol {
            Ok(true)
        } else if key.quote == symbol {
            Ok(false)
        } else {
            Err(LookupError::NotPairMember {
                symbol: symbol.to_string(),
                pair: key.to_string(),
            })
        }
    }

    pub fn trading_contract(&self, key: &PairKey) -> Result<&str, LookupError> {
        self.trading_contracts
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LookupError::TradingPairNotRegistered(key.to_string()))
    }
}
