//! Base builder carrying the built-in defaults every other source overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("endpoint.url", "http://localhost:8545")?
        .set_default("transactions.poll_interval_ms", 1000)?
        .set_default("transactions.confirmations", 1)
}
