//! Shared configuration library for Marquee.
//!
//! Centralizes the defaults, the layered loader (file, `.env`, environment)
//! and the validation rules so every consumer resolves settings the same way.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    BrowseConfig, CarouselConfig, CatalogConfig, Config, DEFAULT_BASE_URL,
    DEFAULT_IMAGE_BASE_URL, MAX_CAROUSEL_SOURCE, MAX_CAROUSEL_WINDOW,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
