//! Prelude module for convenient imports.
//!
//! ```rust
//! use cldex_execution::prelude::*;
//! ```

pub use crate::calls::{AssetTransfer, CallArg, ArgValue, ContractCall, Entrypoint, PlainTransfer};
pub use crate::error::{ExecutionError, PolicyError};
pub use crate::guard::GuardConfig;
pub use crate::planner::{
    AddLiquidityOrder, AmountInput, BridgeOrder, LimitOrder, Planner, RemoveLiquidityOrder,
    SwapOrder, TransferOrder,
};
pub use crate::prompt::{PromptRefresher, PromptSink, RecordingSink, TerminalSink, status_line};
