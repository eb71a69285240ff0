use std::fmt;
use std::sync::Arc;

use marquee_contracts::{MovieCatalog, ReviewStore};
use marquee_model::{CatalogReview, MovieId, NewReview, Review, UserId};
use tracing::{debug, warn};

use crate::error::Result;

/// Reviews for one movie, kept as two separately labelled lists.
///
/// A branch that failed to load is empty and carries its error message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieReviews {
    pub user_reviews: Vec<Review>,
    pub catalog_reviews: Vec<CatalogReview>,
    pub user_error: Option<String>,
    pub catalog_error: Option<String>,
}

impl MovieReviews {
    pub fn is_degraded(&self) -> bool {
        self.user_error.is_some() || self.catalog_error.is_some()
    }

    pub fn total(&self) -> usize {
        self.user_reviews.len() + self.catalog_reviews.len()
    }
}

pub struct ReviewAggregator {
    catalog: Arc<dyn MovieCatalog>,
    store: Arc<dyn ReviewStore>,
}

impl fmt::Debug for ReviewAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewAggregator").finish_non_exhaustive()
    }
}

impl ReviewAggregator {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn ReviewStore>,
    ) -> Self {
        Self { catalog, store }
    }

    /// Load catalog reviews and, for a signed-in user, stored user reviews.
    ///
    /// Both reads run concurrently; neither failure blocks the other.
    pub async fn for_movie(
        &self,
        movie_id: MovieId,
        user_id: Option<&UserId>,
    ) -> MovieReviews {
        let catalog_read = self.catalog.movie_reviews(movie_id);
        let user_read = async {
            match user_id {
                Some(_) => self.store.list_by_movie(movie_id).await.map(Some),
                None => Ok(None),
            }
        };
        let (catalog_result, user_result) =
            tokio::join!(catalog_read, user_read);

        let mut reviews = MovieReviews::default();
        match catalog_result {
            Ok(list) => reviews.catalog_reviews = list,
            Err(err) => {
                warn!(%movie_id, error = %err, "catalog reviews unavailable");
                reviews.catalog_error = Some(err.to_string());
            }
        }
        match user_result {
            Ok(list) => reviews.user_reviews = list.unwrap_or_default(),
            Err(err) => {
                warn!(%movie_id, error = %err, "user reviews unavailable");
                reviews.user_error = Some(err.to_string());
            }
        }

        debug!(
            %movie_id,
            user = reviews.user_reviews.len(),
            catalog = reviews.catalog_reviews.len(),
            "reviews aggregated"
        );
        reviews
    }

    /// Validate, store, then re-read the movie's user reviews.
    ///
    /// Invalid input is rejected before the store is touched.
    pub async fn submit(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
        text: &str,
        rating: u8,
    ) -> Result<Vec<Review>> {
        let review = NewReview::new(user_id.clone(), movie_id, text, rating)?;
        let stored = self.store.add(review).await?;
        debug!(review_id = %stored.review_id, %movie_id, "review stored");
        Ok(self.store.list_by_movie(movie_id).await?)
    }
}
