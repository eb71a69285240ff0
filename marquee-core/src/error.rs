use marquee_contracts::{AuthError, CatalogError, StoreError};
use marquee_model::{MovieId, ValidationError};
use thiserror::Error;

/// Every failure the engine reports. None of them are fatal; each is local
/// to the operation that produced it.
#[derive(Error, Debug)]
pub enum MarqueeError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid review: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Movie {movie_id} is already a favorite")]
    WriteConflict { movie_id: MovieId },

    #[error("Session closed")]
    SessionClosed,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Movie {0} is not loaded in this session")]
    NotLoaded(MovieId),
}

impl From<StoreError> for MarqueeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => {
                MarqueeError::StoreUnavailable(message)
            }
            StoreError::WriteConflict { movie_id, .. } => {
                MarqueeError::WriteConflict { movie_id }
            }
            StoreError::Validation(err) => MarqueeError::Validation(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
