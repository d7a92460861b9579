use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Flat file the shop state is saved to and loaded from.
    pub data_file: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Built-in defaults so the engine runs without any config files
            .set_default("store.data_file", "data.txt")?
            // Base configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Environment-specific overlay, selected by RUN_MODE
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Environment variables, e.g. VELO_STORE__DATA_FILE=/tmp/shop.txt
            .add_source(config::Environment::with_prefix("VELO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
