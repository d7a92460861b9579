pub mod models;
pub mod pricing;
pub mod settlement;

pub use models::{Order, OrderError, OrderLine, PricingScheme};
pub use settlement::{SettlementEngine, SettlementError, ShopState};
