//! Catalog metadata service access.

pub mod params;
pub mod tmdb;
mod wire;

pub use tmdb::TmdbCatalogClient;

/// Clamp a service-reported page count to what the service will serve.
///
/// Never returns less than 1, so an empty result set still has a page.
pub fn clamp_total_pages(reported: u32, max_page: u32) -> u32 {
    reported.min(max_page).max(1)
}
