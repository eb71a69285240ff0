use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use marquee_contracts::FavoriteStore;
use marquee_model::{FavoriteRecord, MovieId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{MarqueeError, Result};
use crate::identity::SessionContext;
use crate::overlay::{FavoriteOverlay, OverlaidMovie};

/// The signed-in user's favorites screen.
///
/// Rows render from the stored snapshots, newest first. Unfavoriting a row
/// removes it only after the store acknowledges.
pub struct FavoritesSession {
    store: Arc<dyn FavoriteStore>,
    identity: SessionContext,
    overlay: FavoriteOverlay,
    records: RwLock<Vec<FavoriteRecord>>,
    cancel: CancellationToken,
}

impl fmt::Debug for FavoritesSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesSession")
            .field("rows", &self.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl FavoritesSession {
    pub fn new(
        store: Arc<dyn FavoriteStore>,
        identity: SessionContext,
    ) -> Self {
        Self {
            overlay: FavoriteOverlay::new(store.clone()),
            store,
            identity,
            records: RwLock::new(Vec::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub async fn load(&self) -> Result<usize> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.require_user()?;
        let since = self.overlay.generation();
        let mut records = self.store.list_by_user(&user_id).await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        self.overlay.replace(&records, since);
        let count = records.len();
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = records;
        debug!(count, "favorites loaded");
        Ok(count)
    }

    pub fn movies(&self) -> Vec<OverlaidMovie> {
        let records =
            self.records.read().unwrap_or_else(PoisonError::into_inner);
        let snapshots: Vec<_> = records
            .iter()
            .map(|record| record.movie_snapshot.clone())
            .collect();
        self.overlay.annotate(&snapshots)
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn unfavorite(&self, movie_id: MovieId) -> Result<()> {
        if self.is_closed() {
            return Err(MarqueeError::SessionClosed);
        }
        let user_id = self.identity.require_user()?;
        let snapshot = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.movie_id == movie_id)
            .map(|record| record.movie_snapshot.clone())
            .ok_or(MarqueeError::NotLoaded(movie_id))?;

        let still_favorite = self.overlay.toggle(&user_id, &snapshot).await?;
        if !still_favorite && !self.is_closed() {
            self.records
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|record| record.movie_id != movie_id);
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn close(&self) {
        if !self.is_closed() {
            self.cancel.cancel();
            info!("favorites session closed");
        }
    }
}

impl Drop for FavoritesSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentityProvider;
    use crate::store::MemoryDocumentStore;
    use marquee_contracts::{MockFavoriteStore, StoreError};
    use marquee_model::{Identity, Movie, UserId};

    fn user() -> UserId {
        UserId::new("fan-0001").unwrap()
    }

    fn context() -> SessionContext {
        SessionContext::new(Arc::new(LocalIdentityProvider::signed_in(
            Identity::new(user()),
        )))
    }

    fn movie(id: u64) -> Movie {
        Movie {
            id: MovieId(id),
            title: format!("Movie {id}"),
            ..Movie::default()
        }
    }

    #[tokio::test]
    async fn lists_snapshots_newest_first() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.add(&user(), &movie(1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store.add(&user(), &movie(2)).await.unwrap();

        let session = FavoritesSession::new(store, context());
        assert_eq!(session.load().await.unwrap(), 2);

        let movies = session.movies();
        assert_eq!(movies[0].movie.id, MovieId(2));
        assert!(movies.iter().all(|entry| entry.is_favorite));
    }

    #[tokio::test]
    async fn unfavorite_removes_row_after_ack() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.add(&user(), &movie(1)).await.unwrap();
        let session = FavoritesSession::new(store.clone(), context());
        session.load().await.unwrap();

        session.unfavorite(MovieId(1)).await.unwrap();
        assert!(session.is_empty());
        assert_eq!(store.favorite_count(), 0);
    }

    #[tokio::test]
    async fn failed_unfavorite_keeps_row() {
        let record = FavoriteRecord::new(user(), movie(4));
        let mut store = MockFavoriteStore::new();
        store
            .expect_list_by_user()
            .returning(move |_| Ok(vec![record.clone()]));
        store
            .expect_remove()
            .returning(|_, _| Err(StoreError::Unavailable("nope".into())));
        let session = FavoritesSession::new(Arc::new(store), context());
        session.load().await.unwrap();

        assert!(session.unfavorite(MovieId(4)).await.is_err());
        assert_eq!(session.len(), 1);
        assert!(session.movies()[0].is_favorite);
    }
}
