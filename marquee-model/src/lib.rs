//! Core data model definitions shared across Marquee crates.
#![allow(missing_docs)]

pub mod details;
pub mod error;
pub mod favorite;
pub mod filter_types;
pub mod identity;
pub mod ids;
pub mod image;
pub mod movie;
pub mod prelude;
pub mod review;

// Intentionally curated re-exports for downstream consumers.
pub use details::{
    CastMember, CatalogReview, Credits, CrewMember, Genre, GenreDirectory,
    MovieDetails,
};
pub use error::{ModelError, Result as ModelResult, ValidationError};
pub use favorite::FavoriteRecord;
pub use filter_types::{
    DiscoverFilters, RatingThreshold, SortBy, genre_label, release_years,
};
pub use identity::Identity;
pub use ids::{GenreId, MovieId, RecordId, UserId};
pub use image::{
    BackdropSize, DEFAULT_IMAGE_BASE, ImageSize, PERSON_PLACEHOLDER,
    POSTER_PLACEHOLDER, PosterSize, ProfileSize, image_url,
};
pub use movie::{Movie, MoviePage};
pub use review::{NewReview, RATING_RANGE, Review};
