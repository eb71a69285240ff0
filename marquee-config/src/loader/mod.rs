pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};
use tracing::debug;

use crate::models::Config;
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["marquee.toml", "config/marquee.toml"];

/// Prefix for structured overrides, e.g. `MARQUEE__CATALOG__API_KEY`
pub const ENV_PREFIX: &str = "MARQUEE";
pub const ENV_SEPARATOR: &str = "__";
/// Names an explicit config file when no path was passed in code
pub const CONFIG_PATH_VAR: &str = "MARQUEE_CONFIG";
/// Bare API key variable honoured when no structured key is set
pub const LEGACY_API_KEY_VAR: &str = "TMDB_API_KEY";

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Replaces the process environment. When set, `.env` files are not
    /// read either.
    pub env: Option<HashMap<String, String>>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
    /// The TOML file that contributed, if any
    pub config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options.env = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let config_path = self.resolve_config_path()?;

        let mut builder = config::Config::builder();
        if let Some(path) = &config_path {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        let mut environment =
            Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR);
        if let Some(vars) = &self.options.env {
            environment = environment.source(Some(
                vars.iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ));
        }
        builder = builder.add_source(environment);

        let mut config: Config = builder.build()?.try_deserialize()?;

        if !config.catalog.has_api_key()
            && let Some(key) = self.env_var(LEGACY_API_KEY_VAR)
        {
            config.catalog.api_key = key;
        }

        let mut warnings = ConfigWarnings::default();
        if config_path.is_none() {
            warnings.push_with_hint(
                "No marquee.toml detected; using defaults and environment variables",
                "Create marquee.toml or set MARQUEE_CONFIG",
            );
        }
        warnings.extend(validation::apply_guard_rails(&config)?);

        debug!(
            config_path = ?config_path,
            env_file_loaded,
            warnings = warnings.len(),
            "configuration loaded"
        );

        Ok(ConfigLoad {
            config,
            warnings,
            config_path,
        })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.env.is_some() {
            return Ok(false);
        }
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        match loaded {
            Ok(loaded) => Ok(loaded),
            Err(err) if err.not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn resolve_config_path(&self) -> Result<Option<PathBuf>, ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| self.env_var(CONFIG_PATH_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok(Some(path));
        }

        Ok(DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(Path::new)
            .find(|candidate| candidate.exists())
            .map(Path::to_path_buf))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        let value = match &self.options.env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        value.filter(|value| !value.trim().is_empty())
    }
}
