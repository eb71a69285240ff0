use async_trait::async_trait;
use dashmap::DashMap;
use marquee_contracts::{FavoriteStore, ReviewStore, StoreError};
use marquee_model::{
    FavoriteRecord, Movie, MovieId, NewReview, RecordId, Review, UserId,
};
use tracing::debug;

/// In-process favorites and reviews collections keyed by generated record id.
///
/// Suitable for tests and single-process hosts; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    favorites: DashMap<RecordId, FavoriteRecord>,
    reviews: DashMap<RecordId, Review>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }
}

#[async_trait]
impl FavoriteStore for MemoryDocumentStore {
    async fn add(
        &self,
        user_id: &UserId,
        movie: &Movie,
    ) -> Result<FavoriteRecord, StoreError> {
        if self
            .favorites
            .iter()
            .any(|entry| entry.matches(user_id, movie.id))
        {
            return Err(StoreError::WriteConflict {
                user_id: user_id.clone(),
                movie_id: movie.id,
            });
        }

        let record = FavoriteRecord::new(user_id.clone(), movie.clone());
        debug!(
            record_id = %record.record_id,
            movie_id = %movie.id,
            "favorite stored"
        );
        self.favorites.insert(record.record_id, record.clone());
        Ok(record)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> Result<usize, StoreError> {
        let matching: Vec<RecordId> = self
            .favorites
            .iter()
            .filter(|entry| entry.matches(user_id, movie_id))
            .map(|entry| *entry.key())
            .collect();

        Ok(matching
            .into_iter()
            .filter_map(|record_id| self.favorites.remove(&record_id))
            .count())
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<FavoriteRecord>, StoreError> {
        Ok(self
            .favorites
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn exists(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .favorites
            .iter()
            .any(|entry| entry.matches(user_id, movie_id)))
    }
}

#[async_trait]
impl ReviewStore for MemoryDocumentStore {
    async fn add(&self, review: NewReview) -> Result<Review, StoreError> {
        let review = review.into_review();
        self.reviews.insert(review.review_id, review.clone());
        Ok(review)
    }

    async fn list_by_movie(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<Review>, StoreError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|entry| entry.movie_id == movie_id)
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; creation order is stable.
        reviews.sort_by_key(|review| (review.created_at, review.review_id));
        Ok(reviews)
    }
}
