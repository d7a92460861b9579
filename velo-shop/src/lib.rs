pub mod shop;
pub mod telemetry;

pub use shop::{Shop, ShopError, Statistics};
