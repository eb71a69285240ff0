//! Screen-scoped sessions. Each owns its query state, overlay and timers and
//! stops all of them on `close()` or drop.

pub mod browse;
pub mod detail;
pub mod favorites;

pub use browse::{
    ApplyResult, BrowseSession, BrowseView, FavoritesRead, FetchOutcome,
};
pub use detail::{DetailSession, DetailView, TOP_CAST_LIMIT};
pub use favorites::FavoritesSession;
