use marquee_model::SortBy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Most items the highlight carousel rotates through
pub const MAX_CAROUSEL_WINDOW: usize = 5;
/// Most latest releases requested for the carousel
pub const MAX_CAROUSEL_SOURCE: usize = 10;

/// Fully resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub catalog: CatalogConfig,
    pub browse: BrowseConfig,
    pub carousel: CarouselConfig,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            browse: BrowseConfig::default(),
            carousel: CarouselConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Run the guard rails against an already assembled configuration.
    pub fn validate(
        &self,
    ) -> Result<crate::ConfigWarnings, crate::ConfigGuardRailError> {
        crate::validation::apply_guard_rails(self)
    }
}

/// Catalog metadata service connection settings.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: String,
    pub language: String,
    /// Highest page the catalog will serve; reported totals are clamped to it
    pub max_page: u32,
    pub request_timeout_secs: u64,
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            max_page: 500,
            request_timeout_secs: 10,
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field(
                "api_key",
                &if self.has_api_key() { "<set>" } else { "<unset>" },
            )
            .field("language", &self.language)
            .field("max_page", &self.max_page)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowseConfig {
    /// Sort order used for a fresh session and when filters are cleared
    pub default_sort: SortBy,
    /// Number of page buttons shown by the pagination control
    pub page_window: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            default_sort: SortBy::default(),
            page_window: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub rotation_secs: u64,
    /// Items shown and rotated through
    pub window: usize,
    /// Items requested from the catalog before windowing
    pub source_limit: usize,
}

impl CarouselConfig {
    pub fn rotation_period(&self) -> Duration {
        Duration::from_secs(self.rotation_secs)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            rotation_secs: 5,
            window: 5,
            source_limit: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let catalog = CatalogConfig {
            api_key: "super-secret".into(),
            ..CatalogConfig::default()
        };
        let rendered = format!("{catalog:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<set>"));
    }

    #[test]
    fn defaults_match_catalog_limits() {
        let config = Config::default();
        assert_eq!(config.catalog.max_page, 500);
        assert_eq!(config.browse.page_window, 5);
        assert_eq!(config.carousel.rotation_period(), Duration::from_secs(5));
        assert!(!config.catalog.has_api_key());
    }
}
