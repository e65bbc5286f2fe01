//! Command Line Interface for the cldex exchange client.
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cldex_data::{HeightSource, MarketSnapshot, SnapshotDecoder, SnapshotSource};
use cldex_domain::entities::PairKey;
use cldex_domain::value_objects::ScaledPrice;
use cldex_execution::prelude::*;
use cldex_market::book::{build_book, history, my_orders};
use cldex_market::valuation::{overview_pairs, total_locked_value};
use cldex_market::ExchangeGraph;
use config::{parse_symbol, EngineConfig, GlobalArgs};
use dotenv::dotenv;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cldex")]
#[command(about = "Valuation, routing and order-book client for a smart-contract DEX", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tokens with balances
    Tokens,
    /// Show pools, owned liquidity and total value locked
    Pairs,
    /// Show heights, network and account key, or one pool's state
    Status {
        /// Pool to inspect, e.g. DERO:DUSDT
        pair: Option<PairKey>,
    },
    /// Convert between two tokens along the cheapest path
    Convert {
        #[arg(value_parser = parse_symbol)]
        from: String,
        #[arg(value_parser = parse_symbol)]
        to: String,
        /// Amount of FROM to convert
        #[arg(default_value = "1")]
        amount: Decimal,
    },
    /// Quote and prepare a swap through a pool
    Swap {
        /// Pool, e.g. DERO:DUSDT
        pair: PairKey,
        /// Token paid in
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// Amount paid in, or "max"
        amount: AmountInput,
    },
    /// Prepare a deposit into a pool
    AddLiquidity {
        pair: PairKey,
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// Amount of SYMBOL, or "max"
        amount: AmountInput,
        /// Other side of the first deposit into an empty pool
        #[arg(long)]
        counter_amount: Option<String>,
    },
    /// Prepare withdrawing a percentage of your position
    RemoveLiquidity {
        pair: PairKey,
        /// Percentage of your shares, 0-100
        percent: Decimal,
    },
    /// Order-book operations
    Trade {
        #[command(subcommand)]
        command: TradeCommand,
    },
    /// Prepare bridging a token out to an Ethereum address
    Bridge {
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        eth_address: String,
        amount: String,
    },
    /// Prepare a plain transfer of a token or of pool shares
    Transfer {
        /// Token symbol, or a pair for its shares
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        destination: String,
        /// Amount, or "max"
        amount: AmountInput,
    },
    /// Prepare registering a token contract as tradable
    RegisterToken { contract: String },
    /// Prepare registering a deployed pool contract for two tokens
    RegisterPair {
        #[arg(value_parser = parse_symbol)]
        token_a: String,
        #[arg(value_parser = parse_symbol)]
        token_b: String,
        pair_contract: String,
    },
    /// Keep the status prompt refreshed
    Watch {
        /// Seconds to run for
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
}

#[derive(Subcommand)]
enum TradeCommand {
    /// Aggregated order book
    Book { pair: PairKey },
    /// Your open orders
    Orders { pair: PairKey },
    /// Recent trades, newest first
    History {
        pair: PairKey,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Prepare a limit buy of token1
    Buy {
        pair: PairKey,
        amount: String,
        price: String,
    },
    /// Prepare a limit sell of token1
    Sell {
        pair: PairKey,
        amount: String,
        price: String,
    },
    /// Prepare cancelling one of your orders
    Cancel { pair: PairKey, order_id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from(cli.global);
    let source = config.load_source()?;
    let snapshot = SnapshotDecoder::new(&source, &config.registry).decode_market();
    let planner = Planner::new(&snapshot, &source, &config.registry, &config.guard);

    match cli.command {
        Commands::Tokens => {
            output::tokens_table(&snapshot, |token| planner.balance(&token.contract_id))
                .printstd();
        }
        Commands::Pairs => show_pairs(&config, &planner, &snapshot),
        Commands::Status { pair: Some(pair) } => {
            let state = snapshot.pairs.require(&pair)?;
            let (token1, token2) = snapshot.pair_tokens(&pair)?;
            output::pair_status_table(state, token1, token2).printstd();
        }
        Commands::Status { pair: None } => {
            println!("Network:        {}", config.network);
            println!(
                "Wallet height:  {}",
                source.wallet_height().unwrap_or_default()
            );
            println!(
                "Daemon height:  {}",
                source.daemon_height().unwrap_or_default()
            );
            println!("Public key:     {}", source.public_key);
            println!(
                "Market:         {} tokens, {} pools, {} order books",
                snapshot.tokens.len(),
                snapshot.pairs.len(),
                snapshot.trading_contracts.len()
            );
        }
        Commands::Convert { from, to, amount } => {
            let graph = ExchangeGraph::build(&snapshot);
            let conversion = graph.convert(&from, &to)?;
            let value = amount
                .checked_mul(conversion.rate)
                .context("converted value overflows")?;
            println!("🔀 {}", conversion.path_description());
            println!("{conversion}");
            println!("{amount} {from} == {} {to}", value.normalize());
        }
        Commands::Swap {
            pair,
            symbol,
            amount,
        } => {
            let order = planner.plan_swap(&pair, &amount, &symbol)?;
            let output_symbol = if pair.base == symbol {
                &pair.quote
            } else {
                &pair.base
            };
            println!(
                "💱 {} {symbol} -> {} {output_symbol} (slippage {:.3}%)",
                order.input, order.output, order.quote.slippage_pct
            );
            output::print_json("Call", &order.call)?;
        }
        Commands::AddLiquidity {
            pair,
            symbol,
            amount,
            counter_amount,
        } => {
            let order =
                planner.plan_add_liquidity(&pair, &amount, &symbol, counter_amount.as_deref())?;
            println!(
                "➕ Deposit {} {} + {} {}",
                order.amount1, pair.base, order.amount2, pair.quote
            );
            match order.shares_minted {
                Some(shares) => println!("   ~{shares} shares minted"),
                None => println!("   First deposit sets the pool price"),
            }
            output::print_json("Call", &order.call)?;
        }
        Commands::RemoveLiquidity { pair, percent } => {
            let order = planner.plan_remove_liquidity(&pair, percent)?;
            println!(
                "➖ Withdraw {}% of {} {} + {} {}: {} {} + {} {} ({} shares)",
                order.percent.normalize(),
                order.owned1,
                pair.base,
                order.owned2,
                pair.quote,
                order.amount1,
                pair.base,
                order.amount2,
                pair.quote,
                order.shares_to_burn
            );
            output::print_json("Call", &order.call)?;
        }
        Commands::Trade { command } => {
            run_trade(command, &config, &planner, &source, &snapshot)?;
        }
        Commands::Bridge {
            symbol,
            eth_address,
            amount,
        } => {
            let order = planner.plan_bridge(&symbol, &eth_address, &amount)?;
            println!(
                "🌉 Bridge {} {symbol} to {eth_address}, fee {} {}",
                order.amount, order.fee, config.guard.native_symbol
            );
            output::print_json("Call", &order.call)?;
        }
        Commands::Transfer {
            symbol,
            destination,
            amount,
        } => {
            let order = planner.plan_transfer(&symbol, &destination, &amount)?;
            println!("📤 Transfer {} {symbol} to {destination}", order.amount);
            output::print_json("Transfer", &order.transfer)?;
        }
        Commands::RegisterToken { contract } => {
            let call = planner.plan_register_token(&contract)?;
            output::print_json("Call", &call)?;
        }
        Commands::RegisterPair {
            token_a,
            token_b,
            pair_contract,
        } => {
            let call = planner.plan_register_pair(&token_a, &token_b, &pair_contract)?;
            output::print_json("Call", &call)?;
        }
        Commands::Watch { seconds } => {
            let refresher = Arc::new(PromptRefresher::new(
                Arc::new(source.clone()),
                Arc::new(Mutex::new(TerminalSink::new())),
                config.network,
            ));
            let handle = Arc::clone(&refresher).spawn();
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            refresher.stop();
            handle.await?;
            println!();
        }
    }

    Ok(())
}

fn show_pairs(
    config: &EngineConfig,
    planner: &Planner<'_, SnapshotSource>,
    snapshot: &MarketSnapshot,
) {
    let overviews = overview_pairs(snapshot, |pair| planner.balance(&pair.contract_id));
    let graph = ExchangeGraph::build(snapshot);
    let tvl = match total_locked_value(snapshot, &graph, &config.reference_symbol) {
        Ok(tvl) => Some(tvl),
        Err(e) => {
            warn!(error = %e, "Total value locked unavailable");
            None
        }
    };

    output::pairs_table(&overviews, tvl.as_ref()).printstd();
    if let Some(tvl) = tvl {
        println!("\n📊 Total value locked: {} {}", tvl.total.round_dp(2), tvl.reference);
    }
}

fn run_trade(
    command: TradeCommand,
    config: &EngineConfig,
    planner: &Planner<'_, SnapshotSource>,
    source: &SnapshotSource,
    snapshot: &MarketSnapshot,
) -> Result<()> {
    let decoder = SnapshotDecoder::new(source, &config.registry);

    match command {
        TradeCommand::Book { pair } => {
            let state = decoder.decode_trading_pair(&pair)?;
            let (token1, token2) = snapshot.pair_tokens(&pair)?;
            let book = build_book(&state);
            if book.is_empty() {
                println!("No open orders on {pair}");
            } else {
                output::book_table(&book, token1, token2).printstd();
            }
            if let Some(trade) = book.last_trade {
                println!(
                    "Last trade: {} {} @ {} ({})",
                    token1.amount(trade.amount_traded),
                    token1.symbol,
                    ScaledPrice(trade.price_at_trade).to_decimal(),
                    output::format_timestamp(trade.timestamp)
                );
            }
        }
        TradeCommand::Orders { pair } => {
            let state = decoder.decode_trading_pair(&pair)?;
            let (token1, token2) = snapshot.pair_tokens(&pair)?;
            let orders = my_orders(&state, &source.public_key);
            output::orders_table(&orders, token1, token2).printstd();
        }
        TradeCommand::History { pair, limit } => {
            let state = decoder.decode_trading_pair(&pair)?;
            let (token1, _) = snapshot.pair_tokens(&pair)?;
            output::history_table(&history(&state), token1, limit).printstd();
        }
        TradeCommand::Buy {
            pair,
            amount,
            price,
        } => {
            let order = planner.plan_buy(&pair, &amount, &price)?;
            println!(
                "🟢 Buy {} {} @ {}, escrow {} {}",
                order.amount1,
                pair.base,
                order.price.to_decimal(),
                order.funding,
                pair.quote
            );
            output::print_json("Call", &order.call)?;
        }
        TradeCommand::Sell {
            pair,
            amount,
            price,
        } => {
            let order = planner.plan_sell(&pair, &amount, &price)?;
            println!(
                "🔴 Sell {} {} @ {}",
                order.amount1,
                pair.base,
                order.price.to_decimal()
            );
            output::print_json("Call", &order.call)?;
        }
        TradeCommand::Cancel { pair, order_id } => {
            let call = planner.plan_cancel(&pair, order_id)?;
            output::print_json("Call", &call)?;
        }
    }
    Ok(())
}
