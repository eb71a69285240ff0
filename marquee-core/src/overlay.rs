//! Favorite flags merged onto immutable catalog movies.

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

use marquee_contracts::{FavoriteStore, StoreError};
use marquee_model::{FavoriteRecord, Movie, MovieId, UserId};
use tracing::{debug, warn};

use crate::error::Result;

/// A catalog movie plus its derived favorite flag.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaidMovie {
    pub movie: Movie,
    pub is_favorite: bool,
}

type MutationKey = (UserId, MovieId);

#[derive(Debug, Default)]
struct Flags {
    favorites: HashMap<MovieId, bool>,
    /// Bumped on every local flag change made by a toggle
    generation: u64,
    /// Generation of the last toggle-driven change per movie
    touched: HashMap<MovieId, u64>,
}

#[derive(Debug)]
struct Lane {
    turn: Arc<tokio::sync::Mutex<()>>,
    holders: usize,
}

/// Per-session favorite overlay.
///
/// Movies stay immutable; the overlay keeps a `movie id -> favorite` map and
/// annotates on render. Toggles for the same `(user, movie)` pair queue
/// behind each other so only one store mutation per pair is ever in flight.
///
/// Store reads are tagged with [`FavoriteOverlay::generation`] when issued.
/// Applying one never overwrites a flag a toggle changed after that point.
pub struct FavoriteOverlay {
    store: Arc<dyn FavoriteStore>,
    flags: RwLock<Flags>,
    in_flight: Mutex<HashMap<MutationKey, Lane>>,
}

impl fmt::Debug for FavoriteOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.flags();
        let favorites =
            flags.favorites.values().filter(|flag| **flag).count();
        f.debug_struct("FavoriteOverlay")
            .field("favorites", &favorites)
            .field("generation", &flags.generation)
            .finish()
    }
}

impl FavoriteOverlay {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self {
            store,
            flags: RwLock::new(Flags::default()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn flags(&self) -> RwLockReadGuard<'_, Flags> {
        self.flags.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn flags_mut(&self) -> RwLockWriteGuard<'_, Flags> {
        self.flags.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lanes(&self) -> MutexGuard<'_, HashMap<MutationKey, Lane>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current mutation generation. Capture it before issuing a favorites
    /// read and hand it back to [`FavoriteOverlay::replace`].
    pub fn generation(&self) -> u64 {
        self.flags().generation
    }

    /// Fetch the user's favorites and rebuild the flag map from them.
    pub async fn load(&self, user_id: &UserId) -> Result<usize> {
        let since = self.generation();
        let records = self.store.list_by_user(user_id).await?;
        self.replace(&records, since);
        Ok(records.len())
    }

    /// Rebuild the flag map from a record list read at generation `since`.
    ///
    /// Movies toggled after `since`, or with a toggle still outstanding,
    /// keep their local flag.
    pub fn replace(&self, records: &[FavoriteRecord], since: u64) {
        let pending: Vec<MovieId> =
            self.lanes().keys().map(|(_, movie_id)| *movie_id).collect();

        let mut flags = self.flags_mut();
        let kept: HashMap<MovieId, bool> = flags
            .favorites
            .iter()
            .filter(|(movie_id, _)| {
                pending.contains(*movie_id)
                    || flags
                        .touched
                        .get(*movie_id)
                        .is_some_and(|touched| *touched > since)
            })
            .map(|(movie_id, flag)| (*movie_id, *flag))
            .collect();
        if !kept.is_empty() {
            debug!(kept = kept.len(), since, "keeping newer local flags");
        }

        flags.favorites.clear();
        flags
            .favorites
            .extend(records.iter().map(|record| (record.movie_id, true)));
        flags.favorites.extend(kept);
    }

    /// Forget every flag, e.g. after sign-out.
    pub fn clear(&self) {
        let mut flags = self.flags_mut();
        flags.favorites.clear();
        flags.touched.clear();
    }

    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        self.flags()
            .favorites
            .get(&movie_id)
            .copied()
            .unwrap_or(false)
    }

    /// True while a toggle for the pair is running or queued.
    pub fn is_pending(&self, user_id: &UserId, movie_id: MovieId) -> bool {
        self.lanes().contains_key(&(user_id.clone(), movie_id))
    }

    pub fn annotate(&self, movies: &[Movie]) -> Vec<OverlaidMovie> {
        let flags = self.flags();
        movies
            .iter()
            .map(|movie| OverlaidMovie {
                movie: movie.clone(),
                is_favorite: flags
                    .favorites
                    .get(&movie.id)
                    .copied()
                    .unwrap_or(false),
            })
            .collect()
    }

    /// Flip the favorite state of `movie` for `user_id`.
    ///
    /// The flag flips immediately and is reverted if the store call fails
    /// or the returned future is dropped before the store answers.
    /// Returns the acknowledged state.
    pub async fn toggle(
        &self,
        user_id: &UserId,
        movie: &Movie,
    ) -> Result<bool> {
        let mut pending = PendingToggle::enter(self, user_id, movie.id);
        pending.held = Some(pending.turn.clone().lock_owned().await);
        self.mutate(user_id, movie, &mut pending).await
    }

    async fn mutate(
        &self,
        user_id: &UserId,
        movie: &Movie,
        pending: &mut PendingToggle<'_>,
    ) -> Result<bool> {
        let was_favorite = self.is_favorite(movie.id);
        self.set_flag(movie.id, !was_favorite);
        pending.revert_to = Some(was_favorite);

        let acknowledged = if was_favorite {
            self.store
                .remove(user_id, movie.id)
                .await
                .map(|removed| {
                    debug!(movie_id = %movie.id, removed, "favorite removed");
                    false
                })
        } else {
            self.add_if_absent(user_id, movie).await
        };
        pending.revert_to = None;

        match acknowledged {
            Ok(state) => {
                self.set_flag(movie.id, state);
                Ok(state)
            }
            Err(err) => {
                warn!(
                    movie_id = %movie.id,
                    error = %err,
                    "favorite toggle failed; reverting"
                );
                self.set_flag(movie.id, was_favorite);
                Err(err.into())
            }
        }
    }

    // The store does not enforce uniqueness, so check before adding.
    async fn add_if_absent(
        &self,
        user_id: &UserId,
        movie: &Movie,
    ) -> std::result::Result<bool, StoreError> {
        if self.store.exists(user_id, movie.id).await? {
            debug!(movie_id = %movie.id, "favorite already stored");
            return Ok(true);
        }
        match self.store.add(user_id, movie).await {
            Ok(record) => {
                debug!(record_id = %record.record_id, "favorite added");
                Ok(true)
            }
            Err(StoreError::WriteConflict { .. }) => Ok(true),
            Err(err) => Err(err),
        }
    }

    fn set_flag(&self, movie_id: MovieId, favorite: bool) {
        let mut flags = self.flags_mut();
        flags.generation += 1;
        let generation = flags.generation;
        flags.touched.insert(movie_id, generation);
        flags.favorites.insert(movie_id, favorite);
    }
}

/// One queued or running toggle.
///
/// Holds the pair's lane open until dropped. Dropping it while the store
/// call is outstanding restores the flag the toggle started from.
struct PendingToggle<'a> {
    overlay: &'a FavoriteOverlay,
    key: MutationKey,
    turn: Arc<tokio::sync::Mutex<()>>,
    held: Option<tokio::sync::OwnedMutexGuard<()>>,
    revert_to: Option<bool>,
}

impl<'a> PendingToggle<'a> {
    fn enter(
        overlay: &'a FavoriteOverlay,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> Self {
        let key = (user_id.clone(), movie_id);
        let turn = {
            let mut lanes = overlay.lanes();
            let lane = lanes.entry(key.clone()).or_insert_with(|| Lane {
                turn: Arc::default(),
                holders: 0,
            });
            lane.holders += 1;
            lane.turn.clone()
        };
        Self {
            overlay,
            key,
            turn,
            held: None,
            revert_to: None,
        }
    }
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        let movie_id = self.key.1;
        if let Some(previous) = self.revert_to.take() {
            warn!(%movie_id, "favorite toggle abandoned; reverting");
            self.overlay.set_flag(movie_id, previous);
        }
        // Release the turn only after the flag is restored.
        drop(self.held.take());

        let mut lanes = self.overlay.lanes();
        if let Some(lane) = lanes.get_mut(&self.key) {
            lane.holders = lane.holders.saturating_sub(1);
            if lane.holders == 0 {
                lanes.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarqueeError;
    use crate::store::MemoryDocumentStore;
    use assert_matches::assert_matches;
    use marquee_contracts::MockFavoriteStore;

    fn user() -> UserId {
        UserId::new("user-42").unwrap()
    }

    fn movie(id: u64) -> Movie {
        Movie {
            id: MovieId(id),
            title: format!("Movie {id}"),
            ..Movie::default()
        }
    }

    #[tokio::test]
    async fn annotate_reflects_loaded_favorites() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.add(&user(), &movie(2)).await.unwrap();
        let overlay = FavoriteOverlay::new(store);

        assert_eq!(overlay.load(&user()).await.unwrap(), 1);
        let rendered = overlay.annotate(&[movie(1), movie(2)]);
        assert!(!rendered[0].is_favorite);
        assert!(rendered[1].is_favorite);
    }

    #[tokio::test]
    async fn toggle_round_trip_updates_store_and_flag() {
        let store = Arc::new(MemoryDocumentStore::new());
        let overlay = FavoriteOverlay::new(store.clone());

        assert!(overlay.toggle(&user(), &movie(5)).await.unwrap());
        assert!(store.exists(&user(), MovieId(5)).await.unwrap());
        assert!(overlay.is_favorite(MovieId(5)));

        assert!(!overlay.toggle(&user(), &movie(5)).await.unwrap());
        assert!(!store.exists(&user(), MovieId(5)).await.unwrap());
        assert!(!overlay.is_favorite(MovieId(5)));
        assert!(!overlay.is_pending(&user(), MovieId(5)));
    }

    #[tokio::test]
    async fn existing_record_reconciles_instead_of_adding() {
        let mut store = MockFavoriteStore::new();
        store.expect_exists().returning(|_, _| Ok(true));
        store.expect_add().never();
        let overlay = FavoriteOverlay::new(Arc::new(store));

        assert!(overlay.toggle(&user(), &movie(3)).await.unwrap());
        assert!(overlay.is_favorite(MovieId(3)));
    }

    #[tokio::test]
    async fn read_issued_before_a_toggle_does_not_undo_it() {
        let store = Arc::new(MemoryDocumentStore::new());
        let overlay = FavoriteOverlay::new(store.clone());

        let since = overlay.generation();
        let earlier = store.list_by_user(&user()).await.unwrap();
        assert!(overlay.toggle(&user(), &movie(4)).await.unwrap());
        overlay.replace(&earlier, since);

        assert!(overlay.is_favorite(MovieId(4)));
        assert!(store.exists(&user(), MovieId(4)).await.unwrap());

        // A read issued after the toggle is authoritative again.
        store.remove(&user(), MovieId(4)).await.unwrap();
        overlay.load(&user()).await.unwrap();
        assert!(!overlay.is_favorite(MovieId(4)));
    }

    #[tokio::test]
    async fn failed_add_reverts_flag() {
        let mut store = MockFavoriteStore::new();
        store.expect_exists().returning(|_, _| Ok(false));
        store
            .expect_add()
            .returning(|_, _| Err(StoreError::Unavailable("offline".into())));
        let overlay = FavoriteOverlay::new(Arc::new(store));

        let err = overlay.toggle(&user(), &movie(8)).await.unwrap_err();
        assert_matches!(
            err,
            MarqueeError::StoreUnavailable(msg) if msg == "offline"
        );
        assert!(!overlay.is_favorite(MovieId(8)));
    }

    #[tokio::test]
    async fn failed_remove_reverts_flag() {
        let mut store = MockFavoriteStore::new();
        store
            .expect_remove()
            .returning(|_, _| Err(StoreError::Unavailable("timeout".into())));
        let overlay = FavoriteOverlay::new(Arc::new(store));
        overlay.replace(
            &[FavoriteRecord::new(user(), movie(8))],
            overlay.generation(),
        );

        assert!(overlay.toggle(&user(), &movie(8)).await.is_err());
        assert!(overlay.is_favorite(MovieId(8)));
    }
}
