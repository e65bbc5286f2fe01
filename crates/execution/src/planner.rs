//! Operation planning.
//!
//! A [`Planner`] sizes each exchange operation against one decoded
//! snapshot and the account's balances, runs the policy guards and returns
//! the call to submit together with the figures shown to the user.

use crate::calls::{ContractCall, Entrypoint, PlainTransfer};
use crate::error::{ExecutionError, PolicyError};
use crate::guard::{GuardConfig, NATIVE_DECIMALS};
use cldex_data::{LookupError, MarketSnapshot, RegistryConfig, StateSource};
use cldex_domain::entities::{PairKey, Token};
use cldex_domain::enums::OrderSide;
use cldex_domain::math::constant_product::{SwapQuote, quote_swap};
use cldex_domain::math::limit_order::buy_order_funding;
use cldex_domain::math::liquidity::{AddLiquidityPlan, plan_add_liquidity, size_remove_liquidity};
use cldex_domain::value_objects::{Amount, RemovalPercent, ScaledPrice};
use cldex_domain::{AmountError, PricingError};
use rust_decimal::Decimal;
use serde::Serialize;
use std::convert::Infallible;
use std::str::FromStr;
use tracing::{debug, info};

/// A user-supplied amount: a decimal number or `max` for the full balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountInput {
    Max,
    Exact(String),
}

impl FromStr for AmountInput {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("max") {
            Ok(Self::Max)
        } else {
            Ok(Self::Exact(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapOrder {
    pub pair: PairKey,
    pub input: Amount,
    pub output: Amount,
    pub quote: SwapQuote,
    pub call: ContractCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddLiquidityOrder {
    pub pair: PairKey,
    pub amount1: Amount,
    pub amount2: Amount,
    /// `None` for the first deposit into an empty pool.
    pub shares_minted: Option<u64>,
    pub call: ContractCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveLiquidityOrder {
    pub pair: PairKey,
    pub owned1: Amount,
    pub owned2: Amount,
    pub amount1: Amount,
    pub amount2: Amount,
    pub shares_to_burn: u64,
    pub percent: Decimal,
    pub call: ContractCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitOrder {
    pub pair: PairKey,
    pub side: OrderSide,
    pub amount1: Amount,
    pub price: ScaledPrice,
    /// What the order escrows: token1 for a sell, token2 for a buy.
    pub funding: Amount,
    pub call: ContractCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeOrder {
    pub symbol: String,
    pub eth_address: String,
    pub amount: Amount,
    /// Paid in the native asset.
    pub fee: Amount,
    pub call: ContractCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferOrder {
    pub symbol: String,
    pub amount: Amount,
    pub transfer: PlainTransfer,
}

/// Sizes operations against one snapshot.
pub struct Planner<'a, S: StateSource + ?Sized> {
    snapshot: &'a MarketSnapshot,
    source: &'a S,
    registry: &'a RegistryConfig,
    guard: &'a GuardConfig,
}

impl<'a, S: StateSource + ?Sized> Planner<'a, S> {
    pub fn new(
        snapshot: &'a MarketSnapshot,
        source: &'a S,
        registry: &'a RegistryConfig,
        guard: &'a GuardConfig,
    ) -> Self {
        Self {
            snapshot,
            source,
            registry,
            guard,
        }
    }

    /// Account balance of an asset; unavailable reads as zero.
    pub fn balance(&self, asset: &str) -> u64 {
        let asset = if asset.bytes().all(|b| b == b'0') { "" } else { asset };
        self.source.balance(asset).unwrap_or(0)
    }

    fn resolve_amount(
        &self,
        asset: &str,
        decimals: u8,
        input: &AmountInput,
    ) -> Result<Amount, ExecutionError> {
        match input {
            AmountInput::Max => {
                let balance = self.balance(asset);
                self.guard.check_positive(balance)?;
                Ok(Amount::new(balance, decimals))
            }
            AmountInput::Exact(text) => Ok(Amount::parse(text, decimals)?),
        }
    }

    fn check_funds(&self, token: &Token, required: u64) -> Result<(), PolicyError> {
        self.guard
            .check_balance(&token.symbol, required, self.balance(&token.contract_id))
    }

    /// Quotes and prepares a swap of `amount` of `symbol` through pool `key`.
    pub fn plan_swap(
        &self,
        key: &PairKey,
        amount: &AmountInput,
        symbol: &str,
    ) -> Result<SwapOrder, ExecutionError> {
        let pair = self.snapshot.pairs.require(key)?;
        let input_is_token1 = self.snapshot.is_first_member(key, symbol)?;
        if !pair.has_liquidity() {
            return Err(PricingError::NoLiquidity.into());
        }
        let (token1, token2) = self.snapshot.pair_tokens(key)?;
        let (token_in, token_out) = if input_is_token1 {
            (token1, token2)
        } else {
            (token2, token1)
        };

        let input = self.resolve_amount(&token_in.contract_id, token_in.decimals, amount)?;
        self.check_funds(token_in, input.raw)?;
        let quote = quote_swap(pair, input_is_token1, input.raw)?;
        self.guard.check_slippage(&quote)?;

        info!(
            pair = %key,
            amount_in = input.raw,
            amount_out = quote.amount_out,
            slippage_pct = quote.slippage_pct,
            "Swap planned"
        );
        Ok(SwapOrder {
            pair: key.clone(),
            input,
            output: token_out.amount(quote.amount_out),
            quote,
            call: ContractCall::new(&pair.contract_id, Entrypoint::Swap)
                .with_transfer(&token_in.contract_id, input.raw),
        })
    }

    /// Prepares a deposit sized from one side.
    ///
    /// An empty pool has no price; `counter_amount` then supplies the other
    /// side and is required.
    pub fn plan_add_liquidity(
        &self,
        key: &PairKey,
        amount: &AmountInput,
        symbol: &str,
        counter_amount: Option<&str>,
    ) -> Result<AddLiquidityOrder, ExecutionError> {
        let pair = self.snapshot.pairs.require(key)?;
        let side_is_token1 = self.snapshot.is_first_member(key, symbol)?;
        let (token1, token2) = self.snapshot.pair_tokens(key)?;
        let (side_token, other_token) = if side_is_token1 {
            (token1, token2)
        } else {
            (token2, token1)
        };
        let side = self.resolve_amount(&side_token.contract_id, side_token.decimals, amount)?;

        let plan = if pair.shares_outstanding == 0 {
            let text = counter_amount.ok_or(PricingError::InitialDepositRequired)?;
            let other = Amount::parse(text, other_token.decimals)?;
            debug!(pair = %key, "Initial deposit, ratio supplied by caller");
            if side_is_token1 {
                AddLiquidityPlan::initial(side.raw, other.raw)
            } else {
                AddLiquidityPlan::initial(other.raw, side.raw)
            }
        } else {
            plan_add_liquidity(pair, side.raw, side_is_token1)?
        };

        self.guard.check_positive(plan.amount1)?;
        self.guard.check_positive(plan.amount2)?;
        self.check_funds(token1, plan.amount1)?;
        self.check_funds(token2, plan.amount2)?;

        info!(
            pair = %key,
            amount1 = plan.amount1,
            amount2 = plan.amount2,
            "Add liquidity planned"
        );
        Ok(AddLiquidityOrder {
            pair: key.clone(),
            amount1: token1.amount(plan.amount1),
            amount2: token2.amount(plan.amount2),
            shares_minted: plan.shares_minted,
            call: ContractCall::new(&pair.contract_id, Entrypoint::AddLiquidity)
                .with_transfer(&token1.contract_id, plan.amount1)
                .with_transfer(&token2.contract_id, plan.amount2),
        })
    }

    /// Prepares withdrawing `percent` of the account's position in `key`.
    pub fn plan_remove_liquidity(
        &self,
        key: &PairKey,
        percent: Decimal,
    ) -> Result<RemoveLiquidityOrder, ExecutionError> {
        let pair = self.snapshot.pairs.require(key)?;
        let (token1, token2) = self.snapshot.pair_tokens(key)?;
        let percent = RemovalPercent::new(percent)?;
        let my_shares = self.balance(&pair.contract_id);
        let plan = size_remove_liquidity(pair, my_shares, percent)?;
        self.guard.check_positive(plan.shares_to_burn)?;

        info!(
            pair = %key,
            shares_to_burn = plan.shares_to_burn,
            percent = %percent.as_decimal(),
            "Remove liquidity planned"
        );
        Ok(RemoveLiquidityOrder {
            pair: key.clone(),
            owned1: token1.amount(plan.owned1),
            owned2: token2.amount(plan.owned2),
            amount1: token1.amount(plan.amount1),
            amount2: token2.amount(plan.amount2),
            shares_to_burn: plan.shares_to_burn,
            percent: percent.as_decimal(),
            call: ContractCall::new(&pair.contract_id, Entrypoint::RemoveLiquidity)
                .with_transfer(&pair.contract_id, plan.shares_to_burn),
        })
    }

    /// Prepares a limit order selling `amount` of token1 at `price` token2.
    pub fn plan_sell(
        &self,
        key: &PairKey,
        amount: &str,
        price: &str,
    ) -> Result<LimitOrder, ExecutionError> {
        let contract = self.snapshot.trading_contract(key)?;
        let (token1, _) = self.snapshot.pair_tokens(key)?;
        let amount1 = Amount::parse(amount, token1.decimals)?;
        let price = parse_price(price)?;
        self.check_funds(token1, amount1.raw)?;

        info!(pair = %key, amount1 = amount1.raw, price = price.0, "Sell order planned");
        Ok(LimitOrder {
            pair: key.clone(),
            side: OrderSide::Sell,
            amount1,
            price,
            funding: amount1,
            call: ContractCall::new(contract, Entrypoint::Sell)
                .with_transfer(&token1.contract_id, amount1.raw)
                .with_uint("price", price.0),
        })
    }

    /// Prepares a limit order buying `amount` of token1 at `price` token2.
    ///
    /// The order escrows token2, one base unit more than the truncated cost.
    pub fn plan_buy(
        &self,
        key: &PairKey,
        amount: &str,
        price: &str,
    ) -> Result<LimitOrder, ExecutionError> {
        let contract = self.snapshot.trading_contract(key)?;
        let (token1, token2) = self.snapshot.pair_tokens(key)?;
        let amount1 = Amount::parse(amount, token1.decimals)?;
        let price = parse_price(price)?;
        let funding = buy_order_funding(amount1.raw, price, token1.decimals, token2.decimals)?;
        self.check_funds(token2, funding)?;

        info!(pair = %key, amount1 = amount1.raw, price = price.0, funding, "Buy order planned");
        Ok(LimitOrder {
            pair: key.clone(),
            side: OrderSide::Buy,
            amount1,
            price,
            funding: token2.amount(funding),
            call: ContractCall::new(contract, Entrypoint::Buy)
                .with_transfer(&token2.contract_id, funding)
                .with_uint("o1", amount1.raw)
                .with_uint("price", price.0),
        })
    }

    pub fn plan_cancel(&self, key: &PairKey, order_id: u64) -> Result<ContractCall, ExecutionError> {
        let contract = self.snapshot.trading_contract(key)?;
        Ok(ContractCall::new(contract, Entrypoint::Cancel).with_uint("tx", order_id))
    }

    /// Prepares bridging `amount` of `symbol` out to `eth_address`.
    pub fn plan_bridge(
        &self,
        symbol: &str,
        eth_address: &str,
        amount: &str,
    ) -> Result<BridgeOrder, ExecutionError> {
        let token = self.snapshot.tokens.require(symbol)?;
        self.guard.check_bridgeable(token)?;
        self.guard.check_eth_address(eth_address)?;
        let amount = Amount::parse(amount, token.decimals)?;
        self.check_funds(token, amount.raw)?;
        self.guard.check_balance(
            &self.guard.native_symbol,
            token.bridge_fee,
            self.balance(""),
        )?;

        info!(symbol, amount = amount.raw, fee = token.bridge_fee, "Bridge planned");
        Ok(BridgeOrder {
            symbol: symbol.to_string(),
            eth_address: eth_address.to_string(),
            amount,
            fee: Amount::new(token.bridge_fee, NATIVE_DECIMALS),
            call: ContractCall::new(&token.contract_id, Entrypoint::Bridge)
                .with_transfer(&token.contract_id, amount.raw)
                .with_transfer("", token.bridge_fee)
                .with_text("eth_addr", eth_address),
        })
    }

    /// Prepares a plain transfer of a token, or of pool shares when `symbol`
    /// names a pair. Shares have no decimals.
    pub fn plan_transfer(
        &self,
        symbol: &str,
        destination: &str,
        amount: &AmountInput,
    ) -> Result<TransferOrder, ExecutionError> {
        if destination.trim().is_empty() {
            return Err(ExecutionError::MissingDestination);
        }
        let (asset, decimals) = match self.snapshot.tokens.get(symbol) {
            Some(token) => (token.contract_id.as_str(), token.decimals),
            None => {
                let pair = symbol
                    .parse::<PairKey>()
                    .ok()
                    .and_then(|key| self.snapshot.pairs.get(&key))
                    .ok_or_else(|| LookupError::TokenNotRegistered(symbol.to_string()))?;
                (pair.contract_id.as_str(), 0)
            }
        };

        let amount = self.resolve_amount(asset, decimals, amount)?;
        self.guard
            .check_balance(symbol, amount.raw, self.balance(asset))?;

        info!(symbol, amount = amount.raw, "Transfer planned");
        Ok(TransferOrder {
            symbol: symbol.to_string(),
            amount,
            transfer: PlainTransfer::new(asset, destination, amount.raw),
        })
    }

    /// Prepares registering the token issued by `contract` as tradable.
    ///
    /// Symbol and decimals are read from the token contract itself.
    pub fn plan_register_token(&self, contract: &str) -> Result<ContractCall, ExecutionError> {
        let not_a_token = || ExecutionError::NotATokenContract(contract.to_string());
        let vars = self.source.fetch_vars(contract).ok_or_else(not_a_token)?;
        let symbol = vars
            .get("symbol")
            .and_then(|value| value.decoded_text())
            .filter(|symbol| !symbol.is_empty())
            .ok_or_else(not_a_token)?;
        let decimals = vars
            .get("decimals")
            .map(|value| value.as_u64())
            .and_then(|raw| u8::try_from(raw).ok())
            .ok_or_else(not_a_token)?;

        if self
            .snapshot
            .tokens
            .get(&symbol)
            .is_some_and(|token| token.tradable)
        {
            return Err(ExecutionError::AlreadyRegistered(symbol));
        }

        info!(%symbol, contract, decimals, "Token registration planned");
        Ok(
            ContractCall::new(&self.registry.swap_registry, Entrypoint::RegisterToken)
                .with_text("symbol", symbol)
                .with_text("scid", contract)
                .with_uint("decimals", u64::from(decimals)),
        )
    }

    /// Prepares registering an already deployed pool contract for
    /// `token_a`/`token_b`.
    ///
    /// Both tokens must be registered, and no pool may exist for the pair in
    /// either order.
    pub fn plan_register_pair(
        &self,
        token_a: &str,
        token_b: &str,
        pair_contract: &str,
    ) -> Result<ContractCall, ExecutionError> {
        self.snapshot.tokens.require(token_a)?;
        self.snapshot.tokens.require(token_b)?;

        let key = PairKey::new(token_a, token_b);
        let reversed = PairKey::new(token_b, token_a);
        if let Some(existing) = [&key, &reversed]
            .into_iter()
            .find(|k| self.snapshot.pairs.get(k).is_some())
        {
            return Err(ExecutionError::AlreadyRegistered(existing.to_string()));
        }

        info!(pair = %key, pair_contract, "Pair registration planned");
        Ok(
            ContractCall::new(&self.registry.swap_registry, Entrypoint::RegisterPair)
                .with_text("tokenA", token_a)
                .with_text("tokenB", token_b)
                .with_text("scid", pair_contract),
        )
    }
}

fn parse_price(text: &str) -> Result<ScaledPrice, AmountError> {
    let value = Decimal::from_str(text.trim()).map_err(|_| AmountError::Invalid(text.to_string()))?;
    let price = ScaledPrice::from_decimal(value)?;
    if price.0 == 0 {
        return Err(AmountError::NotPositive(text.to_string()));
    }
    Ok(price)
}
