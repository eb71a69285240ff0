use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use marquee_config::{Config, MAX_CAROUSEL_SOURCE};
use marquee_contracts::{
    CatalogError, FavoriteStore, MovieCatalog, StoreError,
};
use marquee_model::{
    DiscoverFilters, FavoriteRecord, GenreDirectory, Movie, MovieId, MoviePage,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::carousel::CarouselScheduler;
use crate::error::{MarqueeError, Result};
use crate::identity::SessionContext;
use crate::overlay::{FavoriteOverlay, OverlaidMovie};
use crate::pagination::{PageWindow, window};
use crate::query::{BrowseMode, FetchTicket, PageCount, QueryState};

/// What a browse screen renders.
#[derive(Debug, Clone, Default)]
pub struct BrowseView {
    pub mode: BrowseMode,
    pub filters: DiscoverFilters,
    pub search_text: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub movies: Vec<OverlaidMovie>,
    pub pagination: PageWindow,
    /// Set while a fetch for the current state is outstanding
    pub loading: bool,
    /// Last read failure; the previous results stay on screen
    pub error: Option<String>,
}

pub type FavoritesRead = std::result::Result<Vec<FavoriteRecord>, StoreError>;

/// Raw results of one fetch, not yet applied.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub page: std::result::Result<MoviePage, CatalogError>,
    /// `None` when nobody is signed in
    pub favorites: Option<FavoritesRead>,
    /// Overlay generation the favorites read was issued at
    pub favorites_generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyResult {
    Applied,
    /// The fetched page no longer exists. The session moved to the last
    /// page; run the ticket to show it.
    Redirected(FetchTicket),
    /// A newer state change superseded the ticket
    Stale,
    /// The session was closed before the outcome arrived
    Closed,
}

#[derive(Debug, Default)]
struct Results {
    movies: Vec<Movie>,
    total_results: u64,
    loading: bool,
    error: Option<String>,
}

/// One browse screen: discovery or search results, favorite flags and the
/// highlight carousel.
pub struct BrowseSession {
    catalog: Arc<dyn MovieCatalog>,
    favorites: Arc<dyn FavoriteStore>,
    identity: SessionContext,
    overlay: FavoriteOverlay,
    query: Mutex<QueryState>,
    results: RwLock<Results>,
    genres: RwLock<GenreDirectory>,
    carousel: CarouselScheduler,
    carousel_source_limit: usize,
    page_window: u32,
    cancel: CancellationToken,
}

impl fmt::Debug for BrowseSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowseSession")
            .field("query", &*self.query())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl BrowseSession {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        favorites: Arc<dyn FavoriteStore>,
        identity: SessionContext,
        config: &Config,
    ) -> Self {
        let query = QueryState::new(config.catalog.max_page)
            .with_default_sort(config.browse.default_sort);
        info!(user = ?identity.user_id(), "browse session opened");

        Self {
            overlay: FavoriteOverlay::new(favorites.clone()),
            catalog,
            favorites,
            identity,
            query: Mutex::new(query),
            results: RwLock::new(Results::default()),
            genres: RwLock::new(GenreDirectory::default()),
            carousel: CarouselScheduler::from_config(&config.carousel),
            carousel_source_limit: config
                .carousel
                .source_limit
                .min(MAX_CAROUSEL_SOURCE),
            page_window: u32::try_from(config.browse.page_window)
                .unwrap_or(u32::MAX),
            cancel: CancellationToken::new(),
        }
    }

    fn query(&self) -> MutexGuard<'_, QueryState> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_loading(&self, ticket: FetchTicket) -> FetchTicket {
        self.results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = true;
        ticket
    }

    pub fn set_filters(&self, filters: DiscoverFilters) -> FetchTicket {
        let ticket = self.query().set_filters(filters);
        self.mark_loading(ticket)
    }

    pub fn clear_filters(&self) -> FetchTicket {
        let ticket = self.query().clear_filters();
        self.mark_loading(ticket)
    }

    pub fn submit_search(&self, text: &str) -> Option<FetchTicket> {
        let ticket = self.query().submit_search(text)?;
        Some(self.mark_loading(ticket))
    }

    pub fn go_to_page(&self, page: u32) -> Option<FetchTicket> {
        let ticket = self.query().go_to_page(page)?;
        Some(self.mark_loading(ticket))
    }

    /// Ticket for whatever the session currently shows.
    pub fn current_ticket(&self) -> FetchTicket {
        self.query().ticket()
    }

    /// Run the catalog read for `ticket`, together with the signed-in user's
    /// favorites.
    pub async fn fetch(&self, ticket: FetchTicket) -> Result<FetchOutcome> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.user_id();
        let favorites_generation = self.overlay.generation();
        debug!(
            version = ticket.version,
            request = ?ticket.request,
            "fetching"
        );

        let request = ticket.request.clone();
        let page_read = request.execute(self.catalog.as_ref());
        let favorites_read = async {
            match &user_id {
                Some(user_id) => {
                    Some(self.favorites.list_by_user(user_id).await)
                }
                None => None,
            }
        };

        tokio::select! {
            _ = self.cancel.cancelled() => Err(MarqueeError::SessionClosed),
            (page, favorites) = async {
                tokio::join!(page_read, favorites_read)
            } => Ok(FetchOutcome {
                ticket,
                page,
                favorites,
                favorites_generation,
            }),
        }
    }

    /// Apply a fetched outcome if it still matches the current state.
    ///
    /// A failed catalog read keeps the previous results, records the error
    /// for display and returns it.
    pub fn apply(&self, outcome: FetchOutcome) -> Result<ApplyResult> {
        if self.is_closed() {
            return Ok(ApplyResult::Closed);
        }

        let mut query = self.query();
        if !query.is_current(&outcome.ticket) {
            debug!(
                version = outcome.ticket.version,
                current = query.version(),
                "discarding stale results"
            );
            return Ok(ApplyResult::Stale);
        }

        let mut results =
            self.results.write().unwrap_or_else(PoisonError::into_inner);
        results.loading = false;

        let page = match outcome.page {
            Ok(page) => page,
            Err(err) => {
                warn!(error = %err, "catalog read failed; keeping results");
                results.error = Some(err.to_string());
                return Err(err.into());
            }
        };

        match query.apply_total_pages(&outcome.ticket, page.total_pages) {
            PageCount::Current => {}
            PageCount::Clamped(follow_up) => {
                results.loading = true;
                return Ok(ApplyResult::Redirected(follow_up));
            }
            PageCount::Stale => return Ok(ApplyResult::Stale),
        }
        results.movies = page.results;
        results.total_results = page.total_results;
        results.error = None;

        match outcome.favorites {
            Some(Ok(records)) => self
                .overlay
                .replace(&records, outcome.favorites_generation),
            Some(Err(err)) => {
                warn!(error = %err, "favorites read failed; keeping flags");
                results.error = Some(MarqueeError::from(err).to_string());
            }
            None => self.overlay.clear(),
        }

        Ok(ApplyResult::Applied)
    }

    /// Fetch and apply in one step, following a redirect to the last page.
    pub async fn run(&self, mut ticket: FetchTicket) -> Result<ApplyResult> {
        loop {
            let outcome = self.fetch(ticket).await?;
            match self.apply(outcome)? {
                ApplyResult::Redirected(follow_up) => ticket = follow_up,
                other => return Ok(other),
            }
        }
    }

    /// Re-issue the read for the current state.
    pub async fn refresh(&self) -> Result<ApplyResult> {
        let ticket = self.mark_loading(self.current_ticket());
        self.run(ticket).await
    }

    pub fn view(&self) -> BrowseView {
        let query = self.query();
        let results =
            self.results.read().unwrap_or_else(PoisonError::into_inner);
        BrowseView {
            mode: query.mode(),
            filters: query.filters().clone(),
            search_text: query.search_text().to_string(),
            page: query.page(),
            total_pages: query.total_pages(),
            total_results: results.total_results,
            movies: self.overlay.annotate(&results.movies),
            pagination: window(
                query.page(),
                query.total_pages(),
                self.page_window,
            ),
            loading: results.loading,
            error: results.error.clone(),
        }
    }

    pub fn movies(&self) -> Vec<OverlaidMovie> {
        let results =
            self.results.read().unwrap_or_else(PoisonError::into_inner);
        self.overlay.annotate(&results.movies)
    }

    pub fn pagination(&self) -> PageWindow {
        let query = self.query();
        window(query.page(), query.total_pages(), self.page_window)
    }

    /// Flip the favorite flag for a movie on the current page.
    pub async fn toggle_favorite(&self, movie_id: MovieId) -> Result<bool> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.require_user()?;
        let movie = self
            .results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .movies
            .iter()
            .find(|movie| movie.id == movie_id)
            .cloned()
            .ok_or(MarqueeError::NotLoaded(movie_id))?;

        self.overlay.toggle(&user_id, &movie).await
    }

    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        self.overlay.is_favorite(movie_id)
    }

    /// Load the genre list for the filter bar.
    ///
    /// On failure the built-in labels are used and the error is returned.
    pub async fn load_genres(&self) -> Result<GenreDirectory> {
        let genres = self.catalog.list_genres().await?;
        let directory = GenreDirectory::new(genres);
        *self.genres.write().unwrap_or_else(PoisonError::into_inner) =
            directory.clone();
        Ok(directory)
    }

    pub fn genres(&self) -> GenreDirectory {
        self.genres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch the latest releases and start rotating the first few.
    pub async fn load_highlights(&self) -> Result<usize> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let mut latest = self.catalog.now_playing(1).await?.results;
        latest.truncate(self.carousel_source_limit);

        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        self.carousel.set_items(latest);
        self.carousel.start();
        Ok(self.carousel.snapshot().len())
    }

    pub fn carousel(&self) -> &CarouselScheduler {
        &self.carousel
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Tear the session down. In-flight fetches resolve to `SessionClosed`
    /// and nothing is applied afterwards.
    pub fn close(&self) {
        if !self.is_closed() {
            self.cancel.cancel();
            self.carousel.stop();
            info!("browse session closed");
        }
    }
}

impl Drop for BrowseSession {
    fn drop(&mut self) {
        self.close();
    }
}
