//! Global config file source (`$XDG_CONFIG_HOME/agentreg/config.toml`).

use crate::config::paths::global_config_path;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    // No resolvable home directory means there is simply no global file.
    let Ok(path) = global_config_path() else {
        return Ok(builder);
    };
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
}
