use async_trait::async_trait;
use marquee_model::{
    CatalogReview, Credits, DiscoverFilters, Genre, MovieDetails, MovieId,
    MoviePage,
};

use crate::error::CatalogError;

/// Read-only access to the catalog metadata service.
///
/// Pages are 1-based. Implementations report the service's own
/// `total_pages`; clamping to the supported maximum is the caller's job.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    async fn discover(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<MoviePage, CatalogError>;

    async fn search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<MoviePage, CatalogError>;

    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError>;

    /// Newest theatrical releases, used for the highlight carousel
    async fn now_playing(&self, page: u32) -> Result<MoviePage, CatalogError>;

    async fn movie_details(
        &self,
        id: MovieId,
    ) -> Result<MovieDetails, CatalogError>;

    async fn movie_credits(&self, id: MovieId) -> Result<Credits, CatalogError>;

    async fn movie_reviews(
        &self,
        id: MovieId,
    ) -> Result<Vec<CatalogReview>, CatalogError>;
}
