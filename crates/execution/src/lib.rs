//! Turning engine results into contract calls.
//!
//! This crate provides:
//! - Entrypoint call assembly for every exchange operation
//! - Advisory policy guards checked before anything is submitted
//! - Operation planning over a decoded market snapshot
//! - The periodic status prompt refresher

/// Prelude module for convenient imports.
pub mod prelude;

/// Contract call and transfer descriptions.
pub mod calls;
/// Execution errors.
pub mod error;
/// Policy guards.
pub mod guard;
/// Operation planning.
pub mod planner;
/// Status prompt refresher.
pub mod prompt;
