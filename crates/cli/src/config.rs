//! Runtime configuration.
//!
//! Every option can come from the command line or the environment; a `.env`
//! file is loaded first.

use anyhow::{Context, Result};
use cldex_data::config::{DEFAULT_BRIDGE_REGISTRY, DEFAULT_SWAP_REGISTRY};
use cldex_data::{RegistryConfig, SnapshotSource};
use cldex_domain::enums::Network;
use cldex_execution::guard::GuardConfig;
use cldex_market::valuation::DEFAULT_REFERENCE_SYMBOL;
use clap::Args;
use std::convert::Infallible;
use std::path::PathBuf;

/// Token symbols are stored upper-case; accept them in any case.
pub fn parse_symbol(s: &str) -> Result<String, Infallible> {
    Ok(s.trim().to_uppercase())
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Contract-state snapshot to value
    #[arg(long, global = true, env = "CLDEX_SNAPSHOT", default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    /// Bridge registry contract id
    #[arg(long, global = true, env = "CLDEX_BRIDGE_REGISTRY", default_value = DEFAULT_BRIDGE_REGISTRY)]
    pub bridge_registry: String,

    /// Swap registry contract id
    #[arg(long, global = true, env = "CLDEX_SWAP_REGISTRY", default_value = DEFAULT_SWAP_REGISTRY)]
    pub swap_registry: String,

    /// Token values are reported in
    #[arg(long, global = true, env = "CLDEX_REFERENCE_SYMBOL", default_value = DEFAULT_REFERENCE_SYMBOL, value_parser = parse_symbol)]
    pub reference: String,

    /// Swaps above this slippage percentage are refused
    #[arg(long, global = true, env = "CLDEX_MAX_SLIPPAGE_PCT", default_value_t = 40.0)]
    pub max_slippage: f64,

    /// Symbol of the native asset
    #[arg(long, global = true, env = "CLDEX_NATIVE_SYMBOL", default_value = "DERO", value_parser = parse_symbol)]
    pub native_symbol: String,

    /// Attached to the test network
    #[arg(long, global = true, env = "CLDEX_TESTNET")]
    pub testnet: bool,
}

/// Resolved engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub snapshot_path: PathBuf,
    pub registry: RegistryConfig,
    pub guard: GuardConfig,
    pub reference_symbol: String,
    pub network: Network,
}

impl From<GlobalArgs> for EngineConfig {
    fn from(args: GlobalArgs) -> Self {
        Self {
            snapshot_path: args.snapshot,
            registry: RegistryConfig::new(args.bridge_registry, args.swap_registry),
            guard: GuardConfig {
                max_slippage_pct: args.max_slippage,
                native_symbol: args.native_symbol,
            },
            reference_symbol: args.reference,
            network: if args.testnet {
                Network::Testnet
            } else {
                Network::Mainnet
            },
        }
    }
}

impl EngineConfig {
    pub fn load_source(&self) -> Result<SnapshotSource> {
        SnapshotSource::from_json_file(&self.snapshot_path).with_context(|| {
            format!(
                "failed to load snapshot from {}",
                self.snapshot_path.display()
            )
        })
    }
}
