//! Exchange-rate graph and multi-hop conversion.
//!
//! Every token is a vertex, addressed by its registry index. Each funded
//! pool contributes one edge per direction, costed by its spot rate scaled
//! by 10^7. Conversions follow the cheapest path and compound
//! the scaled hop rates along it.

use crate::error::RouteError;
use cldex_data::MarketSnapshot;
use cldex_domain::math::constant_product::calculate_spot_price;
use cldex_domain::value_objects::{Amount, ScaledPrice};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;
use tracing::{debug, warn};

/// Separator used when rendering a conversion path.
pub const PATH_SEPARATOR: &str = " => ";

/// Outcome of a successful conversion query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    /// Display units of `to` received per display unit of `from`.
    pub rate: Decimal,
    /// Symbols visited, both endpoints included.
    pub path: Vec<String>,
}

impl Conversion {
    pub fn path_description(&self) -> String {
        self.path.join(PATH_SEPARATOR)
    }

    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 {} == {} {}", self.from, self.rate, self.to)
    }
}

/// Directed graph of scaled spot rates between tokens.
#[derive(Debug, Clone, Default)]
pub struct ExchangeGraph {
    symbols: Vec<String>,
    vertices: BTreeMap<String, usize>,
    edges: Vec<BTreeMap<usize, u64>>,
}

impl ExchangeGraph {
    /// Builds the graph from every pool with both reserves non-zero.
    ///
    /// Pools naming an unregistered token are skipped. When two pools link
    /// the same tokens the cheaper edge is kept.
    #[must_use]
    pub fn build(snapshot: &MarketSnapshot) -> Self {
        let symbols: Vec<String> = snapshot.tokens.iter().map(|t| t.symbol.clone()).collect();
        let vertices = snapshot
            .tokens
            .iter()
            .map(|t| (t.symbol.clone(), t.index))
            .collect();
        let mut graph = Self {
            edges: vec![BTreeMap::new(); symbols.len()],
            symbols,
            vertices,
        };

        for pair in snapshot.pairs.iter().filter(|p| p.has_liquidity()) {
            let (Some(token1), Some(token2)) = (
                snapshot.tokens.get(&pair.key.base),
                snapshot.tokens.get(&pair.key.quote),
            ) else {
                debug!(pair = %pair.key, "Pair references an unregistered token, no edge");
                continue;
            };
            let reserve1 = token1.amount(pair.reserve1);
            let reserve2 = token2.amount(pair.reserve2);

            let directions = [
                (token1, reserve1, token2, reserve2),
                (token2, reserve2, token1, reserve1),
            ];
            for (from, reserve_in, to, reserve_out) in directions {
                match scaled_rate(reserve_in, reserve_out) {
                    Some(cost) => graph.add_edge(from.index, to.index, cost),
                    None => warn!(
                        pair = %pair.key,
                        from = %from.symbol,
                        to = %to.symbol,
                        "Spot rate out of range, no edge"
                    ),
                }
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Built exchange graph"
        );
        graph
    }

    fn add_edge(&mut self, from: usize, to: usize, cost: u64) {
        let Some(adjacent) = self.edges.get_mut(from) else {
            return;
        };
        adjacent
            .entry(to)
            .and_modify(|existing| *existing = (*existing).min(cost))
            .or_insert(cost);
    }

    pub fn vertex_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(BTreeMap::len).sum()
    }

    pub fn vertex(&self, symbol: &str) -> Option<usize> {
        self.vertices.get(symbol).copied()
    }

    pub fn edge_cost(&self, from: usize, to: usize) -> Option<u64> {
        self.edges.get(from)?.get(&to).copied()
    }

    /// Cheapest path from `from` to `to` by summed edge cost, as vertex ids.
    ///
    /// `from == to` yields the single-vertex path.
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let n = self.edges.len();
        if from >= n || to >= n {
            return None;
        }

        let mut dist: Vec<Option<u64>> = vec![None; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut heap = BinaryHeap::new();
        dist[from] = Some(0);
        heap.push(Reverse((0u64, from)));

        while let Some(Reverse((cost, vertex))) = heap.pop() {
            if vertex == to {
                break;
            }
            if dist[vertex].is_some_and(|best| cost > best) {
                continue;
            }
            for (&next, &weight) in &self.edges[vertex] {
                let candidate = cost.saturating_add(weight);
                if dist[next].is_none_or(|best| candidate < best) {
                    dist[next] = Some(candidate);
                    prev[next] = Some(vertex);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }

        dist[to]?;
        let mut path = vec![to];
        let mut current = to;
        while let Some(p) = prev[current] {
            path.push(p);
            current = p;
        }
        path.reverse();
        Some(path)
    }

    /// Converts one display unit of `from` into `to` along the cheapest path.
    ///
    /// # Errors
    ///
    /// `UnknownToken` when either symbol has no vertex, `NoPath` when the
    /// two are not connected.
    pub fn convert(&self, from: &str, to: &str) -> Result<Conversion, RouteError> {
        let start = self
            .vertex(from)
            .ok_or_else(|| RouteError::UnknownToken(from.to_string()))?;
        let end = self
            .vertex(to)
            .ok_or_else(|| RouteError::UnknownToken(to.to_string()))?;

        let vertices = self
            .shortest_path(start, end)
            .ok_or_else(|| RouteError::NoPath {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        let mut rate = Decimal::ONE;
        for hop in vertices.windows(2) {
            let cost = self.edge_cost(hop[0], hop[1]).unwrap_or_default();
            rate = rate
                .checked_mul(ScaledPrice(cost).to_decimal())
                .ok_or(RouteError::Overflow)?;
        }

        Ok(Conversion {
            from: from.to_string(),
            to: to.to_string(),
            rate: rate.normalize(),
            path: vertices
                .iter()
                .filter_map(|&v| self.symbols.get(v).cloned())
                .collect(),
        })
    }
}

/// Spot rate of `reserve_in`'s token in units of `reserve_out`'s token,
/// scaled by 10^7 and truncated.
fn scaled_rate(reserve_in: Amount, reserve_out: Amount) -> Option<u64> {
    let spot = calculate_spot_price(reserve_in, reserve_out).ok()?;
    ScaledPrice::from_decimal(spot).ok().map(|price| price.0)
}
