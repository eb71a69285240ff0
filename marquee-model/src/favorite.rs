use chrono::{DateTime, Utc};

use crate::ids::{MovieId, RecordId, UserId};
use crate::movie::Movie;

/// A stored favorite.
///
/// `movie_snapshot` is captured when the user favorites the movie and is
/// never refreshed afterwards. At most one record exists per
/// `(user_id, movie_id)` pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FavoriteRecord {
    pub record_id: RecordId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub movie_snapshot: Movie,
    pub created_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn new(user_id: UserId, movie: Movie) -> Self {
        Self {
            record_id: RecordId::new(),
            user_id,
            movie_id: movie.id,
            movie_snapshot: movie,
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, user_id: &UserId, movie_id: MovieId) -> bool {
        self.movie_id == movie_id && &self.user_id == user_id
    }
}
