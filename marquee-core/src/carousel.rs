//! Time-driven rotation over the highlight window.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use marquee_config::{CarouselConfig, MAX_CAROUSEL_WINDOW};
use marquee_model::Movie;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Items on show plus the highlighted index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselState {
    items: Vec<Movie>,
    index: usize,
}

impl CarouselState {
    /// Keep the first `window` items of `source`, never more than
    /// [`MAX_CAROUSEL_WINDOW`].
    pub fn new(source: Vec<Movie>, window: usize) -> Self {
        let mut items = source;
        items.truncate(window.min(MAX_CAROUSEL_WINDOW));
        Self { items, index: 0 }
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Movie> {
        self.items.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.index + 1)
    }

    pub fn prev(&mut self) -> usize {
        self.go_to(self.index + self.len().saturating_sub(1))
    }

    /// Jump to `index`, wrapping. No-op without items.
    pub fn go_to(&mut self, index: usize) -> usize {
        if !self.items.is_empty() {
            self.index = index % self.items.len();
        }
        self.index
    }
}

#[derive(Debug)]
struct Timer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Timer {
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Owns a [`CarouselState`] and the timer that rotates it.
///
/// Manual navigation does not pause or re-phase the timer. At most one timer
/// runs at a time; re-arming replaces it. Dropping the scheduler stops it.
#[derive(Debug)]
pub struct CarouselScheduler {
    state: Arc<Mutex<CarouselState>>,
    index_tx: Arc<watch::Sender<usize>>,
    period: Duration,
    window: usize,
    timer: Mutex<Option<Timer>>,
}

impl CarouselScheduler {
    pub fn new(period: Duration, window: usize) -> Self {
        let (index_tx, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(CarouselState::default())),
            index_tx: Arc::new(index_tx),
            period,
            window,
            timer: Mutex::new(None),
        }
    }

    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.rotation_period(), config.window)
    }

    fn state(&self) -> MutexGuard<'_, CarouselState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a new item set and restart from the first item.
    ///
    /// An empty set stops the timer; a running timer is replaced.
    pub fn set_items(&self, source: Vec<Movie>) {
        let state = CarouselState::new(source, self.window);
        let empty = state.is_empty();
        *self.state() = state;
        self.index_tx.send_replace(0);

        if empty {
            self.stop();
        } else if self.is_running() {
            self.start();
        }
    }

    /// Arm the rotation timer, replacing any running one.
    ///
    /// Returns `false` when there is nothing to rotate or no runtime.
    pub fn start(&self) -> bool {
        self.stop();
        if self.state().is_empty() {
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("carousel timer needs a tokio runtime");
            return false;
        };

        let cancel = CancellationToken::new();
        let task = runtime.spawn(rotate(
            self.state.clone(),
            self.index_tx.clone(),
            self.period,
            cancel.clone(),
        ));
        *self.timer.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Timer { cancel, task });
        debug!(period = ?self.period, "carousel timer armed");
        true
    }

    pub fn stop(&self) {
        let timer = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(timer) = timer {
            timer.stop();
            debug!("carousel timer stopped");
        }
    }

    /// Back to the first item with a fresh timer phase.
    pub fn reset(&self) {
        let index = self.state().go_to(0);
        self.index_tx.send_replace(index);
        if self.is_running() {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|timer| !timer.cancel.is_cancelled())
    }

    pub fn next(&self) -> usize {
        let index = self.state().next();
        self.index_tx.send_replace(index);
        index
    }

    pub fn prev(&self) -> usize {
        let index = self.state().prev();
        self.index_tx.send_replace(index);
        index
    }

    pub fn go_to(&self, index: usize) -> usize {
        let index = self.state().go_to(index);
        self.index_tx.send_replace(index);
        index
    }

    pub fn index(&self) -> usize {
        self.state().index()
    }

    pub fn current(&self) -> Option<Movie> {
        self.state().current().cloned()
    }

    pub fn snapshot(&self) -> CarouselState {
        self.state().clone()
    }

    /// Observe index changes from both the timer and manual navigation.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index_tx.subscribe()
    }
}

impl Drop for CarouselScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn rotate(
    state: Arc<Mutex<CarouselState>>,
    index_tx: Arc<watch::Sender<usize>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let index = state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .next();
                index_tx.send_replace(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::MovieId;

    fn movies(count: u64) -> Vec<Movie> {
        (1..=count)
            .map(|id| Movie {
                id: MovieId(id),
                title: format!("Movie {id}"),
                ..Movie::default()
            })
            .collect()
    }

    #[test]
    fn next_wraps_after_full_cycle() {
        let mut state = CarouselState::new(movies(5), 5);
        for _ in 0..4 {
            state.next();
        }
        assert_eq!(state.index(), 4);
        assert_eq!(state.next(), 0);

        for _ in 0..5 {
            state.next();
        }
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn prev_and_go_to_wrap() {
        let mut state = CarouselState::new(movies(5), 5);
        assert_eq!(state.prev(), 4);
        assert_eq!(state.go_to(7), 2);
        assert_eq!(state.current().map(|m| m.id), Some(MovieId(3)));
    }

    #[test]
    fn window_limits_items() {
        let state = CarouselState::new(movies(10), 5);
        assert_eq!(state.len(), 5);
        assert_eq!(state.items()[4].id, MovieId(5));
    }

    #[test]
    fn oversized_window_is_capped() {
        let state = CarouselState::new(movies(10), 8);
        assert_eq!(state.len(), MAX_CAROUSEL_WINDOW);
    }

    #[test]
    fn empty_state_ignores_navigation() {
        let mut state = CarouselState::new(Vec::new(), 5);
        assert_eq!(state.next(), 0);
        assert_eq!(state.prev(), 0);
        assert_eq!(state.go_to(3), 0);
        assert!(state.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_advances_once_per_period() {
        let scheduler = CarouselScheduler::new(Duration::from_secs(5), 5);
        scheduler.set_items(movies(3));
        let mut index = scheduler.subscribe();
        let started = Instant::now();
        assert!(scheduler.start());

        index.changed().await.unwrap();
        assert_eq!(*index.borrow_and_update(), 1);
        assert_eq!(started.elapsed(), Duration::from_secs(5));

        index.changed().await.unwrap();
        index.changed().await.unwrap();
        assert_eq!(*index.borrow_and_update(), 0);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_replaces_the_timer() {
        let scheduler = CarouselScheduler::new(Duration::from_secs(5), 5);
        scheduler.set_items(movies(5));
        assert!(scheduler.start());
        assert!(scheduler.start());
        scheduler.set_items(movies(5));

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(scheduler.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_keeps_timer_phase() {
        let scheduler = CarouselScheduler::new(Duration::from_secs(5), 5);
        scheduler.set_items(movies(5));
        scheduler.start();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(scheduler.go_to(3), 3);
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(scheduler.index(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_and_empty_items_cancel_rotation() {
        let scheduler = CarouselScheduler::new(Duration::from_secs(5), 5);
        scheduler.set_items(movies(5));
        scheduler.start();
        scheduler.stop();
        assert!(!scheduler.is_running());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(scheduler.index(), 0);

        scheduler.start();
        scheduler.set_items(Vec::new());
        assert!(!scheduler.is_running());
        assert!(!scheduler.start());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scheduler_ends_the_task() {
        let scheduler = CarouselScheduler::new(Duration::from_secs(5), 5);
        scheduler.set_items(movies(2));
        let mut index = scheduler.subscribe();
        scheduler.start();
        drop(scheduler);

        // The sender lives on only inside the (now cancelled) task.
        assert!(index.changed().await.is_err());
    }
}
