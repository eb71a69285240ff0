use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

use crate::error::ValidationError;
use crate::ids::{MovieId, RecordId, UserId};

/// Accepted user rating values
pub const RATING_RANGE: RangeInclusive<u8> = 1..=10;

/// A user-authored review, append-only once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Review {
    pub review_id: RecordId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub text: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn author_label(&self) -> String {
        format!("User {}", self.user_id.short())
    }
}

/// A validated review submission that has not been stored yet.
///
/// Only constructible through [`NewReview::new`], so anything holding one
/// already satisfies the text and rating rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    user_id: UserId,
    movie_id: MovieId,
    text: String,
    rating: u8,
}

impl NewReview {
    pub fn new(
        user_id: UserId,
        movie_id: MovieId,
        text: impl Into<String>,
        rating: u8,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if !RATING_RANGE.contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        Ok(Self {
            user_id,
            movie_id,
            text,
            rating,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Stamp the submission with a record id and creation time.
    pub fn into_review(self) -> Review {
        Review {
            review_id: RecordId::new(),
            user_id: self.user_id,
            movie_id: self.movie_id,
            text: self.text,
            rating: self.rating,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn rejects_blank_text() {
        let err = NewReview::new(user(), MovieId(1), "  \n", 5).unwrap_err();
        assert_eq!(err, ValidationError::EmptyText);
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        for rating in [0, 11, 255] {
            let err =
                NewReview::new(user(), MovieId(1), "fine", rating).unwrap_err();
            assert_eq!(err, ValidationError::RatingOutOfRange(rating));
        }
    }

    #[test]
    fn accepts_bounds() {
        assert!(NewReview::new(user(), MovieId(1), "meh", 1).is_ok());
        assert!(NewReview::new(user(), MovieId(1), "great", 10).is_ok());
    }

    #[test]
    fn author_label_uses_short_user_id() {
        let review = NewReview::new(
            UserId::new("abcdefghijkl").unwrap(),
            MovieId(1),
            "ok",
            6,
        )
        .unwrap()
        .into_review();
        assert_eq!(review.author_label(), "User abcdefgh");
    }
}
