// Per-session state and the registry that hands it out
use crate::application::refresh_driver::RefreshDriver;
use crate::application::result_cache::ResultCache;
use crate::domain::dashboard::WeatherPage;
use crate::domain::history::WeatherHistory;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, MutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const DEFAULT_SESSION_ID: &str = "default";

const PAGE_CHANNEL_CAPACITY: usize = 16;

/// Mutable state touched by a render pass
#[derive(Debug)]
pub struct SessionState {
    pub history: WeatherHistory,
    pub cache: ResultCache,
}

/// One interactive user's context. Render passes hold the state lock for
/// their whole duration, so passes for the same session never interleave.
pub struct Session {
    id: String,
    state: Mutex<SessionState>,
    refresh: RefreshDriver,
    pages: broadcast::Sender<WeatherPage>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Session {
    pub fn new(id: String, history_cap: usize) -> Self {
        let (pages, _) = broadcast::channel(PAGE_CHANNEL_CAPACITY);
        Self {
            id,
            state: Mutex::new(SessionState {
                history: WeatherHistory::with_cap(history_cap),
                cache: ResultCache::new(),
            }),
            refresh: RefreshDriver::new(),
            pages,
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    pub fn refresh(&self) -> &RefreshDriver {
        &self.refresh
    }

    /// Push a page rendered outside a request to stream subscribers.
    pub fn publish(&self, page: WeatherPage) {
        // No subscribers is fine; the page is still reflected in session state
        let _ = self.pages.send(page);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WeatherPage> {
        self.pages.subscribe()
    }

    /// Record client activity. Refresh ticks do not count.
    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
    }

    /// No open stream and no request for at least `timeout`
    fn is_abandoned(&self, timeout: Duration) -> bool {
        self.pages.receiver_count() == 0 && self.idle_for() >= timeout
    }
}

/// Session registry keyed by session id. A session lives until it has been
/// abandoned for `idle_timeout` and a sweep releases it.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<Session>>>>,
    history_cap: usize,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(history_cap: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            history_cap,
            idle_timeout,
        }
    }

    /// Look up or create the session and mark it as seen.
    pub async fn get_or_create(&self, id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.read().await.get(id) {
            session.touch();
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating session {}", id);
                Arc::new(Session::new(id.to_string(), self.history_cap))
            })
            .clone();
        session.touch();
        session
    }

    /// Drop abandoned sessions and stop their auto-refresh. Returns how many were released.
    pub async fn sweep_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, session| {
            if !session.is_abandoned(self.idle_timeout) {
                return true;
            }
            tracing::info!("Releasing idle session {}", id);
            // The refresh task holds its own handle on the session, so stop it explicitly
            session.refresh().disable();
            false
        });

        before - sessions.len()
    }

    /// Run `sweep_idle` every `every` for as long as the runtime lives.
    pub fn spawn_idle_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let released = store.sweep_idle().await;
                if released > 0 {
                    tracing::debug!("Idle sweep released {} sessions", released);
                }
            }
        })
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::sample_at;

    const IDLE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_same_id_returns_same_session() {
        let store = SessionStore::new(20, IDLE);

        let a = store.get_or_create("alice").await;
        let again = store.get_or_create("alice").await;

        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(20, IDLE);
        let alice = store.get_or_create("alice").await;
        let bob = store.get_or_create("bob").await;

        alice.lock().await.history.append(sample_at(0));

        assert_eq!(alice.lock().await.history.len(), 1);
        assert!(bob.lock().await.history.is_empty());
        assert_eq!(bob.id(), "bob");
    }

    #[tokio::test]
    async fn test_history_cap_comes_from_store() {
        let store = SessionStore::new(3, IDLE);
        let session = store.get_or_create(DEFAULT_SESSION_ID).await;

        assert_eq!(session.lock().await.history.cap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_releases_only_abandoned_sessions() {
        let store = SessionStore::new(20, IDLE);
        store.get_or_create("gone").await;
        store.get_or_create("active").await;
        let watched = store.get_or_create("watched").await;
        let _stream = watched.subscribe();

        tokio::time::advance(Duration::from_secs(59)).await;
        store.get_or_create("active").await;
        assert_eq!(store.sweep_idle().await, 0);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.sweep_idle().await, 1);
        assert_eq!(store.len().await, 2);

        // A released id starts over with an empty session
        let fresh = store.get_or_create("gone").await;
        assert!(fresh.lock().await.history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_stops_auto_refresh() {
        use crate::application::refresh_driver::{RefreshCycle, RefreshInterval, RefreshState};
        use async_trait::async_trait;

        struct Noop;

        #[async_trait]
        impl RefreshCycle for Noop {
            async fn invalidate(&self) {}
            async fn render(&self) {}
        }

        let store = SessionStore::new(20, IDLE);
        let session = store.get_or_create("tab").await;
        session.refresh().enable(RefreshInterval::from_secs(10), Arc::new(Noop));

        tokio::time::advance(IDLE).await;
        assert_eq!(store.sweep_idle().await, 1);
        assert_eq!(session.refresh().state(), RefreshState::Idle);
    }
}
