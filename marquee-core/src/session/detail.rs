use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use marquee_contracts::{FavoriteStore, MovieCatalog, ReviewStore};
use marquee_model::{CastMember, Credits, MovieDetails, MovieId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{MarqueeError, Result};
use crate::identity::SessionContext;
use crate::overlay::FavoriteOverlay;
use crate::reviews::{MovieReviews, ReviewAggregator};

/// Cast members shown on the detail screen
pub const TOP_CAST_LIMIT: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct DetailView {
    pub details: Option<MovieDetails>,
    pub credits: Credits,
    pub reviews: MovieReviews,
    pub is_favorite: bool,
    pub error: Option<String>,
}

/// One movie detail screen.
pub struct DetailSession {
    movie_id: MovieId,
    catalog: Arc<dyn MovieCatalog>,
    identity: SessionContext,
    overlay: FavoriteOverlay,
    aggregator: ReviewAggregator,
    view: RwLock<DetailView>,
    cancel: CancellationToken,
}

impl fmt::Debug for DetailSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailSession")
            .field("movie_id", &self.movie_id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl DetailSession {
    pub fn new(
        movie_id: MovieId,
        catalog: Arc<dyn MovieCatalog>,
        favorites: Arc<dyn FavoriteStore>,
        reviews: Arc<dyn ReviewStore>,
        identity: SessionContext,
    ) -> Self {
        Self {
            movie_id,
            aggregator: ReviewAggregator::new(catalog.clone(), reviews),
            overlay: FavoriteOverlay::new(favorites),
            catalog,
            identity,
            view: RwLock::new(DetailView::default()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    /// Load details and credits together, then both review sources.
    ///
    /// Missing details fail the load; missing credits, reviews or
    /// favorites only degrade the view.
    pub async fn load(&self) -> Result<()> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.user_id();

        let (details, credits) = tokio::select! {
            _ = self.cancel.cancelled() => {
                return Err(MarqueeError::SessionClosed);
            }
            pair = async {
                tokio::join!(
                    self.catalog.movie_details(self.movie_id),
                    self.catalog.movie_credits(self.movie_id),
                )
            } => pair,
        };

        let details = match details {
            Ok(details) => details,
            Err(err) => {
                warn!(
                    movie_id = %self.movie_id,
                    error = %err,
                    "details unavailable"
                );
                self.write_view(|view| view.error = Some(err.to_string()));
                return Err(err.into());
            }
        };
        let credits = credits.unwrap_or_else(|err| {
            warn!(
                movie_id = %self.movie_id,
                error = %err,
                "credits unavailable"
            );
            Credits::default()
        });

        let (reviews, favorites) = tokio::join!(
            self.aggregator.for_movie(self.movie_id, user_id.as_ref()),
            async {
                match &user_id {
                    Some(user_id) => Some(self.overlay.load(user_id).await),
                    None => None,
                }
            },
        );
        if let Some(Err(err)) = &favorites {
            warn!(error = %err, "favorite state unavailable");
        }

        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let is_favorite = self.overlay.is_favorite(self.movie_id);
        self.write_view(|view| {
            view.details = Some(details);
            view.credits = credits;
            view.reviews = reviews;
            view.is_favorite = is_favorite;
            view.error = None;
        });
        debug!(movie_id = %self.movie_id, "detail loaded");
        Ok(())
    }

    pub fn view(&self) -> DetailView {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Billed cast, at most `limit` entries
    pub fn top_cast(&self, limit: usize) -> Vec<CastMember> {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .credits
            .top_billed(limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_favorite(&self) -> bool {
        self.overlay.is_favorite(self.movie_id)
    }

    pub async fn toggle_favorite(&self) -> Result<bool> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.require_user()?;
        let movie = self
            .view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .details
            .as_ref()
            .map(|details| details.movie.clone())
            .ok_or(MarqueeError::NotLoaded(self.movie_id))?;

        let result = self.overlay.toggle(&user_id, &movie).await;
        let is_favorite = self.overlay.is_favorite(self.movie_id);
        self.write_view(|view| view.is_favorite = is_favorite);
        result
    }

    /// Store a review and refresh the user review list from the store.
    pub async fn submit_review(&self, text: &str, rating: u8) -> Result<()> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.require_user()?;
        let user_reviews = self
            .aggregator
            .submit(&user_id, self.movie_id, text, rating)
            .await?;

        self.write_view(|view| {
            view.reviews.user_reviews = user_reviews;
            view.reviews.user_error = None;
        });
        Ok(())
    }

    fn write_view(&self, update: impl FnOnce(&mut DetailView)) {
        if self.is_closed() {
            return;
        }
        let mut view =
            self.view.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut *view);
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn close(&self) {
        if !self.is_closed() {
            self.cancel.cancel();
            info!(movie_id = %self.movie_id, "detail session closed");
        }
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentityProvider;
    use crate::store::MemoryDocumentStore;
    use assert_matches::assert_matches;
    use marquee_contracts::MockMovieCatalog;
    use marquee_model::{Identity, Movie, UserId};

    fn cast(count: u32) -> Credits {
        Credits {
            cast: (0..count)
                .map(|order| CastMember {
                    id: order as u64,
                    name: format!("Actor {order}"),
                    character: None,
                    profile_path: None,
                    order,
                })
                .collect(),
            crew: vec![],
        }
    }

    fn catalog() -> MockMovieCatalog {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_details().returning(|id| {
            Ok(MovieDetails {
                movie: Movie {
                    id,
                    title: "Heat".into(),
                    ..Movie::default()
                },
                ..MovieDetails::default()
            })
        });
        catalog.expect_movie_credits().returning(|_| Ok(cast(20)));
        catalog.expect_movie_reviews().returning(|_| Ok(vec![]));
        catalog
    }

    fn signed_in() -> SessionContext {
        let identity = Identity::new(UserId::new("viewer-99").unwrap());
        SessionContext::new(Arc::new(LocalIdentityProvider::signed_in(
            identity,
        )))
    }

    fn session(identity: SessionContext) -> DetailSession {
        let store = Arc::new(MemoryDocumentStore::new());
        DetailSession::new(
            MovieId(949),
            Arc::new(catalog()),
            store.clone(),
            store,
            identity,
        )
    }

    #[tokio::test]
    async fn load_fills_view_and_limits_cast() {
        let session = session(signed_in());
        session.load().await.unwrap();

        let view = session.view();
        assert_eq!(view.details.unwrap().movie.title, "Heat");
        assert_eq!(session.top_cast(TOP_CAST_LIMIT).len(), 12);
        assert!(!view.is_favorite);
    }

    #[tokio::test]
    async fn review_submission_refreshes_user_list() {
        let session = session(signed_in());
        session.load().await.unwrap();
        session.submit_review("Tense and great", 9).await.unwrap();

        let reviews = session.view().reviews;
        assert_eq!(reviews.user_reviews.len(), 1);
        assert_eq!(reviews.user_reviews[0].author_label(), "User viewer-9");
    }

    #[tokio::test]
    async fn anonymous_viewer_cannot_favorite_or_review() {
        let anonymous =
            SessionContext::new(Arc::new(LocalIdentityProvider::new()));
        let session = session(anonymous);
        session.load().await.unwrap();

        assert_matches!(
            session.toggle_favorite().await,
            Err(MarqueeError::NotSignedIn)
        );
        assert_matches!(
            session.submit_review("hi", 5).await,
            Err(MarqueeError::NotSignedIn)
        );
    }

    #[tokio::test]
    async fn favorite_toggle_updates_view() {
        let session = session(signed_in());
        session.load().await.unwrap();
        assert!(session.toggle_favorite().await.unwrap());
        assert!(session.view().is_favorite);
    }

    #[tokio::test]
    async fn closed_session_ignores_loads() {
        let session = session(signed_in());
        session.close();
        assert_matches!(
            session.load().await,
            Err(MarqueeError::SessionClosed)
        );
        assert!(session.view().details.is_none());
    }
}
