//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::RegistryConfig;
use crate::error::RegistryError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment, then validate it.
    pub fn load(workspace_root: &Path) -> Result<RegistryConfig, RegistryError> {
        let config = MergeService::load(workspace_root)?;
        config.validate().map_err(RegistryError::ConfigError)?;
        Ok(config)
    }

    /// Load configuration from a specific file, then validate it.
    pub fn load_from_file(path: &Path) -> Result<RegistryConfig, RegistryError> {
        let config = MergeService::load_from_file(path)?;
        config.validate().map_err(RegistryError::ConfigError)?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> RegistryConfig {
        RegistryConfig::default()
    }
}
