pub mod app_config;
pub mod codec;

pub use app_config::Config;
pub use codec::{load, save, StoreError};
