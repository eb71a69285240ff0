//! Trait surfaces that describe interactions with Marquee's external services.

pub mod catalog;
pub mod error;
pub mod identity;
pub mod store;

pub use catalog::MovieCatalog;
pub use error::{AuthError, CatalogError, StoreError};
pub use identity::IdentityProvider;
pub use store::{FavoriteStore, ReviewStore};

#[cfg(feature = "mock")]
pub use catalog::MockMovieCatalog;
#[cfg(feature = "mock")]
pub use identity::MockIdentityProvider;
#[cfg(feature = "mock")]
pub use store::{MockFavoriteStore, MockReviewStore};

/// Frequently used trait imports for engine crates.
pub mod prelude {
    pub use super::catalog::MovieCatalog;
    pub use super::error::{AuthError, CatalogError, StoreError};
    pub use super::identity::IdentityProvider;
    pub use super::store::{FavoriteStore, ReviewStore};
}
