use thiserror::Error;
use url::Url;

use crate::models::{Config, MAX_CAROUSEL_SOURCE, MAX_CAROUSEL_WINDOW};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} is {value}; at most {max} is supported")]
    TooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Reject configurations the engine cannot run with and collect warnings
/// for ones it can run with but probably should not.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    ensure_http_url("catalog.base_url", &config.catalog.base_url)?;
    ensure_http_url("catalog.image_base_url", &config.catalog.image_base_url)?;

    ensure_nonzero("catalog.max_page", config.catalog.max_page as u64)?;
    ensure_nonzero(
        "catalog.request_timeout_secs",
        config.catalog.request_timeout_secs,
    )?;
    ensure_nonzero("browse.page_window", config.browse.page_window as u64)?;
    ensure_nonzero("carousel.rotation_secs", config.carousel.rotation_secs)?;
    ensure_nonzero("carousel.window", config.carousel.window as u64)?;
    ensure_nonzero(
        "carousel.source_limit",
        config.carousel.source_limit as u64,
    )?;
    ensure_at_most(
        "carousel.window",
        config.carousel.window,
        MAX_CAROUSEL_WINDOW,
    )?;
    ensure_at_most(
        "carousel.source_limit",
        config.carousel.source_limit,
        MAX_CAROUSEL_SOURCE,
    )?;

    if !config.catalog.has_api_key() {
        warnings.push_with_hint(
            "No catalog API key configured; catalog requests will be rejected",
            "Set MARQUEE__CATALOG__API_KEY or TMDB_API_KEY",
        );
    }

    if config.carousel.source_limit < config.carousel.window {
        warnings.push(format!(
            "carousel.source_limit ({}) is below carousel.window ({}); the carousel will never fill",
            config.carousel.source_limit, config.carousel.window
        ));
    }

    Ok(warnings)
}

fn ensure_http_url(
    field: &'static str,
    value: &str,
) -> Result<(), ConfigGuardRailError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigGuardRailError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

fn ensure_at_most(
    field: &'static str,
    value: usize,
    max: usize,
) -> Result<(), ConfigGuardRailError> {
    if value > max {
        Err(ConfigGuardRailError::TooLarge {
            field,
            value: value as u64,
            max: max as u64,
        })
    } else {
        Ok(())
    }
}

fn ensure_nonzero(
    field: &'static str,
    value: u64,
) -> Result<(), ConfigGuardRailError> {
    if value == 0 {
        Err(ConfigGuardRailError::Zero { field })
    } else {
        Ok(())
    }
}
