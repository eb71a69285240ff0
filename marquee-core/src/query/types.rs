use marquee_contracts::{CatalogError, MovieCatalog};
use marquee_model::{DiscoverFilters, MoviePage};

/// Mutually exclusive browse modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseMode {
    #[default]
    Discover,
    Search,
}

/// One catalog read, fully described.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRequest {
    Discover { filters: DiscoverFilters, page: u32 },
    Search { query: String, page: u32 },
}

impl CatalogRequest {
    pub fn page(&self) -> u32 {
        match self {
            CatalogRequest::Discover { page, .. }
            | CatalogRequest::Search { page, .. } => *page,
        }
    }

    pub fn mode(&self) -> BrowseMode {
        match self {
            CatalogRequest::Discover { .. } => BrowseMode::Discover,
            CatalogRequest::Search { .. } => BrowseMode::Search,
        }
    }

    pub async fn execute(
        &self,
        catalog: &dyn MovieCatalog,
    ) -> Result<MoviePage, CatalogError> {
        match self {
            CatalogRequest::Discover { filters, page } => {
                catalog.discover(filters, *page).await
            }
            CatalogRequest::Search { query, page } => {
                catalog.search(query, *page).await
            }
        }
    }
}

/// What recording a completed fetch's page count did to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum PageCount {
    /// The ticket was superseded; nothing changed
    Stale,
    /// The fetched page is within the new total
    Current,
    /// The fetched page lies past the new total. The state moved to the
    /// last page and this ticket fetches it.
    Clamped(FetchTicket),
}

/// A catalog request tagged with the query-state version it was issued
/// under. Only outcomes whose ticket is still current may be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub version: u64,
    pub request: CatalogRequest,
}
