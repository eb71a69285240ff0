use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ConfigGuardRailError;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to assemble configuration")]
    Build {
        #[source]
        source: config::ConfigError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

impl From<config::ConfigError> for ConfigLoadError {
    fn from(source: config::ConfigError) -> Self {
        ConfigLoadError::Build { source }
    }
}
