pub mod amount;
pub mod percentage;
pub mod price;

pub use amount::Amount;
pub use percentage::{Percentage, RemovalPercent};
pub use price::{PRICE_SCALE, ScaledPrice};
