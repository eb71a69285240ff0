use marquee_model::{MovieId, UserId, ValidationError};

/// Failures reading the catalog metadata service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Failures reading or writing the per-user document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Favorite already recorded for user {user_id} and movie {movie_id}")]
    WriteConflict { user_id: UserId, movie_id: MovieId },

    #[error("Invalid review: {0}")]
    Validation(#[from] ValidationError),
}

/// Failures reported by the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in was cancelled")]
    Cancelled,

    #[error("Identity provider error: {0}")]
    Provider(String),
}
