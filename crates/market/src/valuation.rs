//! Pool overview and total locked value.

use crate::error::RouteError;
use crate::router::ExchangeGraph;
use cldex_data::MarketSnapshot;
use cldex_domain::entities::{Pair, PairKey};
use cldex_domain::math::liquidity::{owned_reserves, ownership_percent};
use cldex_domain::value_objects::Amount;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// Reference asset used when the caller does not name one.
pub const DEFAULT_REFERENCE_SYMBOL: &str = "DUSDT";

/// One row of the pools overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairOverview {
    pub key: PairKey,
    pub reserve1: Amount,
    pub reserve2: Amount,
    /// Pool shares held by the account.
    pub my_shares: u64,
    /// Zero for a pool without shares outstanding.
    pub ownership_pct: Decimal,
    /// Reserves redeemable by `my_shares`.
    pub owned1: Amount,
    pub owned2: Amount,
}

/// Builds the overview of every pool in `snapshot`.
///
/// # Arguments
///
/// * `snapshot` - Decoded market state
/// * `shares_of` - Account's share balance for a pool
///
/// Pools whose tokens are not registered are left out. Pools without shares
/// outstanding are reported as empty.
pub fn overview_pairs<F>(snapshot: &MarketSnapshot, shares_of: F) -> Vec<PairOverview>
where
    F: Fn(&Pair) -> u64,
{
    let mut rows = Vec::with_capacity(snapshot.pairs.len());
    for pair in snapshot.pairs.iter() {
        let Ok((token1, token2)) = snapshot.pair_tokens(&pair.key) else {
            warn!(pair = %pair.key, "Skipping pair with unregistered token");
            continue;
        };

        if pair.shares_outstanding == 0 {
            rows.push(PairOverview {
                key: pair.key.clone(),
                reserve1: token1.amount(0),
                reserve2: token2.amount(0),
                my_shares: 0,
                ownership_pct: Decimal::ZERO,
                owned1: token1.amount(0),
                owned2: token2.amount(0),
            });
            continue;
        }

        let my_shares = shares_of(pair);
        let (owned1, owned2) = owned_reserves(pair, my_shares).unwrap_or_else(|err| {
            warn!(pair = %pair.key, %err, "Cannot size owned reserves");
            (0, 0)
        });
        rows.push(PairOverview {
            key: pair.key.clone(),
            reserve1: token1.amount(pair.reserve1),
            reserve2: token2.amount(pair.reserve2),
            my_shares,
            ownership_pct: ownership_percent(pair, my_shares).unwrap_or_default(),
            owned1: token1.amount(owned1),
            owned2: token2.amount(owned2),
        });
    }
    rows
}

/// Aggregate value of all pool reserves in one reference asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockedValue {
    pub reference: String,
    pub total: Decimal,
    /// Value of each counted pool, in `snapshot.pairs` order.
    pub per_pair: Vec<(PairKey, Decimal)>,
}

/// Sums every pool's reserves, converted to `reference` along the graph.
///
/// Only pools with shares outstanding count. A reserve whose token cannot
/// be converted contributes zero.
///
/// # Errors
///
/// `UnknownToken` if `reference` itself is not a registered token.
pub fn total_locked_value(
    snapshot: &MarketSnapshot,
    graph: &ExchangeGraph,
    reference: &str,
) -> Result<LockedValue, RouteError> {
    if graph.vertex(reference).is_none() {
        return Err(RouteError::UnknownToken(reference.to_string()));
    }

    let mut total = Decimal::ZERO;
    let mut per_pair = Vec::new();
    for pair in snapshot.pairs.iter().filter(|p| p.shares_outstanding > 0) {
        let Ok((token1, token2)) = snapshot.pair_tokens(&pair.key) else {
            continue;
        };
        let value = reserve_value(graph, &token1.symbol, token1.amount(pair.reserve1), reference)
            .saturating_add(reserve_value(
                graph,
                &token2.symbol,
                token2.amount(pair.reserve2),
                reference,
            ));
        total = total.saturating_add(value);
        per_pair.push((pair.key.clone(), value));
    }

    Ok(LockedValue {
        reference: reference.to_string(),
        total,
        per_pair,
    })
}

fn reserve_value(graph: &ExchangeGraph, symbol: &str, reserve: Amount, reference: &str) -> Decimal {
    match graph.convert(symbol, reference) {
        Ok(conversion) => reserve
            .to_decimal()
            .checked_mul(conversion.rate)
            .unwrap_or_else(|| {
                warn!(symbol, "Reserve value overflowed, counted as zero");
                Decimal::ZERO
            }),
        Err(err) => {
            debug!(symbol, reference, %err, "Reserve not convertible, counted as zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cldex_data::{PairRegistry, TokenRegistry};
    use rust_decimal_macros::dec;

    fn pool(a: &str, b: &str, reserve1: u64, reserve2: u64, shares: u64) -> Pair {
        let mut pair = Pair::new(PairKey::new(a, b), format!("{a}{b}"));
        pair.reserve1 = reserve1;
        pair.reserve2 = reserve2;
        pair.shares_outstanding = shares;
        pair
    }

    fn market() -> MarketSnapshot {
        let mut tokens = TokenRegistry::new();
        tokens.insert("DERO", "", 5);
        tokens.insert("DUSDT", "usdt", 6);
        tokens.insert("DETH", "eth", 6);
        tokens.insert("LONE", "lone", 2);
        tokens.insert("ORPHAN", "orphan", 0);
        let mut pairs = PairRegistry::new();
        // 1 DERO = 2 DUSDT
        pairs.insert(pool("DERO", "DUSDT", 1_000_000, 20_000_000, 1_000));
        // 1 DETH = 10 DERO
        pairs.insert(pool("DETH", "DERO", 1_000_000, 1_000_000, 500));
        // disconnected pool
        pairs.insert(pool("LONE", "ORPHAN", 500, 7, 10));
        pairs.insert(pool("DUSDT", "DETH", 0, 0, 0));
        MarketSnapshot {
            tokens,
            pairs,
            ..Default::default()
        }
    }

    #[test]
    fn test_total_locked_value() {
        let snapshot = market();
        let graph = ExchangeGraph::build(&snapshot);
        let tvl = total_locked_value(&snapshot, &graph, DEFAULT_REFERENCE_SYMBOL).unwrap();

        // DERO:DUSDT = 10 DERO * 2 + 20 DUSDT = 40
        // DETH:DERO  = 1 DETH * 20 + 10 DERO * 2 = 40
        // LONE:ORPHAN has no path to DUSDT
        assert_eq!(tvl.total, dec!(80));
        assert_eq!(tvl.per_pair.len(), 3);
        assert!(tvl.per_pair.contains(&(PairKey::new("LONE", "ORPHAN"), Decimal::ZERO)));
    }

    #[test]
    fn test_unknown_reference() {
        let snapshot = market();
        let graph = ExchangeGraph::build(&snapshot);
        assert_eq!(
            total_locked_value(&snapshot, &graph, "NOPE"),
            Err(RouteError::UnknownToken("NOPE".into()))
        );
    }

    #[test]
    fn test_overview_rows() {
        let snapshot = market();
        let rows = overview_pairs(&snapshot, |pair| {
            if pair.key == PairKey::new("DERO", "DUSDT") { 250 } else { 0 }
        });
        assert_eq!(rows.len(), 4);

        let row = rows
            .iter()
            .find(|r| r.key == PairKey::new("DERO", "DUSDT"))
            .unwrap();
        assert_eq!(row.ownership_pct, dec!(25));
        assert_eq!(row.owned1.raw, 250_000);
        assert_eq!(row.owned2.to_decimal(), dec!(5));

        let empty = rows
            .iter()
            .find(|r| r.key == PairKey::new("DUSDT", "DETH"))
            .unwrap();
        assert_eq!(empty.ownership_pct, Decimal::ZERO);
        assert_eq!(empty.reserve1.raw, 0);
    }
}
