use async_trait::async_trait;
use marquee_model::{
    FavoriteRecord, Movie, MovieId, NewReview, Review, UserId,
};

use crate::error::StoreError;

/// The per-user favorites collection.
///
/// The store does not enforce `(user, movie)` uniqueness atomically; callers
/// check [`FavoriteStore::exists`] before [`FavoriteStore::add`].
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Record `movie` as a favorite, snapshotting it as-is.
    async fn add(
        &self,
        user_id: &UserId,
        movie: &Movie,
    ) -> Result<FavoriteRecord, StoreError>;

    /// Delete every record for the pair and return how many were removed.
    async fn remove(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> Result<usize, StoreError>;

    /// All favorites for a user, in no particular order.
    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<FavoriteRecord>, StoreError>;

    async fn exists(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> Result<bool, StoreError>;
}

/// The append-only user reviews collection.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn add(&self, review: NewReview) -> Result<Review, StoreError>;

    /// All reviews for a movie, in store order.
    async fn list_by_movie(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<Review>, StoreError>;
}
