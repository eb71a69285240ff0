//! Common imports for crates consuming Marquee models.

pub use crate::details::{
    CastMember, CatalogReview, Credits, CrewMember, Genre, GenreDirectory,
    MovieDetails,
};
pub use crate::error::{ModelError, ValidationError};
pub use crate::favorite::FavoriteRecord;
pub use crate::filter_types::{DiscoverFilters, RatingThreshold, SortBy};
pub use crate::identity::Identity;
pub use crate::ids::{GenreId, MovieId, RecordId, UserId};
pub use crate::image::{ImageSize, image_url};
pub use crate::movie::{Movie, MoviePage};
pub use crate::review::{NewReview, Review};
