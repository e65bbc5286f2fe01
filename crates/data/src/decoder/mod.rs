//! Turns registry and contract storage into a [`MarketSnapshot`].
//!
//! Decoding is best-effort: unreadable contracts yield empty results and
//! unparsable fields read as zero. Nothing here returns a hard error except
//! lookups of a specific trading pair the caller asked for.

mod trading;

pub use trading::{decode_trading_state, parse_history_entry};

use crate::config::RegistryConfig;
use crate::error::LookupError;
use crate::keys::RegistryKey;
use crate::registry::{MarketSnapshot, PairRegistry, TokenRegistry};
use crate::source::StateSource;
use crate::value::{ContractVars, StorageValue};
use cldex_domain::entities::{Pair, PairKey, TradingPairState};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Decodes market state from a [`StateSource`].
///
/// Holds no state between calls; every method fetches what it needs again.
pub struct SnapshotDecoder<'a, S: StateSource + ?Sized> {
    source: &'a S,
    config: &'a RegistryConfig,
}

impl<'a, S: StateSource + ?Sized> SnapshotDecoder<'a, S> {
    pub fn new(source: &'a S, config: &'a RegistryConfig) -> Self {
        Self { source, config }
    }

    /// Tokens, pools and trading contracts in one pass.
    pub fn decode_market(&self) -> MarketSnapshot {
        let swap_vars = self.registry_vars(&self.config.swap_registry);
        let tokens = self.decode_tokens_with(swap_vars.as_ref());
        let pairs = self.decode_pairs_with(swap_vars.as_ref());
        let trading_contracts = swap_vars
            .as_ref()
            .map(trading_contracts_of)
            .unwrap_or_default();

        info!(
            tokens = tokens.len(),
            pairs = pairs.len(),
            trading_pairs = trading_contracts.len(),
            "Decoded market snapshot"
        );

        MarketSnapshot {
            tokens,
            pairs,
            trading_contracts,
        }
    }

    pub fn decode_tokens(&self) -> TokenRegistry {
        let swap_vars = self.registry_vars(&self.config.swap_registry);
        self.decode_tokens_with(swap_vars.as_ref())
    }

    pub fn decode_pairs(&self) -> PairRegistry {
        let swap_vars = self.registry_vars(&self.config.swap_registry);
        self.decode_pairs_with(swap_vars.as_ref())
    }

    /// Decodes the order-book contract registered for `key`.
    pub fn decode_trading_pair(&self, key: &PairKey) -> Result<TradingPairState, LookupError> {
        let contract = self
            .source
            .fetch_var(
                &self.config.swap_registry,
                &RegistryKey::trading_contract_key(key),
            )
            .and_then(|value| value.raw_text().map(str::to_string))
            .ok_or_else(|| LookupError::TradingPairNotRegistered(key.to_string()))?;

        Ok(self.decode_trading_contract(key.clone(), &contract))
    }

    /// Decodes a known order-book contract. An unreadable contract yields an
    /// empty state.
    pub fn decode_trading_contract(&self, key: PairKey, contract: &str) -> TradingPairState {
        let vars = self.source.fetch_vars(contract).unwrap_or_else(|| {
            warn!(contract, pair = %key, "Trading contract unavailable");
            ContractVars::new()
        });
        decode_trading_state(key, contract, &vars)
    }

    /// Every registered order-book contract, decoded.
    pub fn decode_trading_pairs(&self) -> BTreeMap<PairKey, TradingPairState> {
        let Some(swap_vars) = self.registry_vars(&self.config.swap_registry) else {
            return BTreeMap::new();
        };
        trading_contracts_of(&swap_vars)
            .into_iter()
            .map(|(key, contract)| {
                let state = self.decode_trading_contract(key.clone(), &contract);
                (key, state)
            })
            .collect()
    }

    fn registry_vars(&self, contract: &str) -> Option<ContractVars> {
        let vars = self.source.fetch_vars(contract);
        if vars.is_none() {
            warn!(contract, "Registry unavailable, treating as empty");
        }
        vars
    }

    fn decode_tokens_with(&self, swap_vars: Option<&ContractVars>) -> TokenRegistry {
        let mut registry = TokenRegistry::new();

        if let Some(bridge_vars) = self.registry_vars(&self.config.bridge_registry) {
            for (key, value) in &bridge_vars {
                let RegistryKey::BridgeToken(symbol) = RegistryKey::parse(key) else {
                    continue;
                };
                let Some(contract) = contract_pointer(key, value) else {
                    continue;
                };
                let token_vars = self.source.fetch_vars(contract).unwrap_or_default();
                let decimals = decimals_field(&symbol, token_vars.get("decimals"));
                let bridge_fee = u64_field(&token_vars, "bridgeFee");

                let token = registry.insert(&symbol, contract, decimals);
                token.bridgeable = true;
                token.bridge_fee = bridge_fee;
            }
        }

        if let Some(swap_vars) = swap_vars {
            for (key, value) in swap_vars {
                let RegistryKey::TradableToken(symbol) = RegistryKey::parse(key) else {
                    continue;
                };
                if let Some(token) = registry.get_mut(&symbol) {
                    token.tradable = true;
                    continue;
                }
                let Some(contract) = contract_pointer(key, value) else {
                    continue;
                };
                let decimals =
                    decimals_field(&symbol, swap_vars.get(&RegistryKey::decimals_key(&symbol)));
                registry.insert(&symbol, contract, decimals).tradable = true;
            }
        }

        registry
    }

    fn decode_pairs_with(&self, swap_vars: Option<&ContractVars>) -> PairRegistry {
        let mut registry = PairRegistry::new();
        let Some(swap_vars) = swap_vars else {
            return registry;
        };

        for (key, value) in swap_vars {
            let RegistryKey::Pair(pair_key) = RegistryKey::parse(key) else {
                continue;
            };
            let Some(contract) = contract_pointer(key, value) else {
                continue;
            };
            let vars = self.source.fetch_vars(contract).unwrap_or_else(|| {
                warn!(contract, pair = %pair_key, "Pair contract unavailable");
                ContractVars::new()
            });

            let mut pair = Pair::new(pair_key, contract);
            pair.fee_bps = u64_field(&vars, "fee");
            pair.reserve1 = u64_field(&vars, "val1");
            pair.reserve2 = u64_field(&vars, "val2");
            pair.adds = u64_field(&vars, "adds");
            pair.removals = u64_field(&vars, "rems");
            pair.swaps = u64_field(&vars, "swaps");
            pair.shares_outstanding = u64_field(&vars, "sharesOutstanding");

            if pair.shares_outstanding > 0 && !pair.has_liquidity() {
                warn!(pair = %pair.key, "Pair has shares outstanding but an empty reserve");
            }
            registry.insert(pair);
        }

        registry
    }
}

fn trading_contracts_of(swap_vars: &ContractVars) -> BTreeMap<PairKey, String> {
    swap_vars
        .iter()
        .filter_map(|(key, value)| match RegistryKey::parse(key) {
            RegistryKey::TradingContract(pair_key) => {
                contract_pointer(key, value).map(|c| (pair_key, c.to_string()))
            }
            _ => None,
        })
        .collect()
}

fn contract_pointer<'v>(key: &str, value: &'v StorageValue) -> Option<&'v str> {
    let contract = value.raw_text();
    if contract.is_none() {
        debug!(key, "Registry entry does not hold a contract id, skipping");
    }
    contract
}

fn u64_field(vars: &ContractVars, name: &str) -> u64 {
    vars.get(name).map_or(0, StorageValue::as_u64)
}

fn decimals_field(symbol: &str, value: Option<&StorageValue>) -> u8 {
    let raw = value.map_or(0, StorageValue::as_u64);
    u8::try_from(raw).unwrap_or_else(|_| {
        warn!(symbol, decimals = raw, "Decimals out of range, using 0");
        0
    })
}
