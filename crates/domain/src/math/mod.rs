/// Constant-product swap pricing.
pub mod constant_product;
/// Overflow-safe `(a * b) / c`.
pub mod fixed_point;
/// Limit-order funding amounts.
pub mod limit_order;
/// Liquidity add/remove sizing.
pub mod liquidity;

pub use fixed_point::mul_div;
