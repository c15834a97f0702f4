use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use agenda_core::cache::{AppointmentSource, CacheStats};
use agenda_core::calendar::CalendarEvent;
use agenda_core::week::{PrefetchRequest, WeekKey};

use super::store::{WeekEntry, WeekStore};
use crate::config::CacheConfig;

/// Week-granular appointment cache.
///
/// Serves the selected week from an LRU store of recently viewed weeks,
/// de-duplicates fetches, warms surrounding weeks in the background and
/// overlays optimistic events until they are confirmed or expire.
///
/// Cloning yields another handle to the same cache. Background work holds
/// only weak references, so dropping the last handle stops it. Timers run
/// on the Tokio runtime, so the cache must be used from within one.
///
/// Observers read [`WeekCache::version`] or await changes through
/// [`WeekCache::subscribe`]; the version increases whenever the visible
/// state of the current week may have changed.
#[derive(Clone)]
pub struct WeekCache {
    pub(super) inner: Arc<Inner>,
}

pub(super) struct Inner {
    pub(super) source: Arc<dyn AppointmentSource>,
    pub(super) config: CacheConfig,
    state: Mutex<CacheState>,
    version: watch::Sender<u64>,
}

pub(super) struct CacheState {
    pub(super) store: WeekStore,
    pub(super) in_flight: HashMap<WeekKey, InFlight>,
    pub(super) next_ticket: u64,
    pub(super) prefetch_queue: VecDeque<PrefetchRequest>,
    pub(super) current: Option<WeekKey>,
    pub(super) error: Option<String>,
    pub(super) last_temp_id: i64,
    pub(super) timers: Timers,
    memo: Option<Memo>,
}

/// Bookkeeping for one outstanding fetch.
#[derive(Debug, Clone, Copy)]
pub(super) struct InFlight {
    pub(super) ticket: u64,
    pub(super) background: bool,
}

struct Memo {
    key: WeekKey,
    version: u64,
    events: Arc<Vec<CalendarEvent>>,
}

#[derive(Default)]
pub(super) struct Timers {
    pub(super) prefetch: Option<JoinHandle<()>>,
    pub(super) refresh: Option<JoinHandle<()>>,
}

impl Timers {
    fn abort_all(&mut self) {
        for handle in [self.prefetch.take(), self.refresh.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

impl CacheState {
    /// Next temporary id: negative, derived from the clock, strictly decreasing.
    pub(super) fn next_temp_id(&mut self, now_millis: i64) -> i64 {
        let id = (-now_millis.max(1)).min(self.last_temp_id - 1);
        self.last_temp_id = id;
        id
    }

    /// Returns true if `key` is the selected week.
    pub(super) fn is_current(&self, key: Option<WeekKey>) -> bool {
        key.is_some() && key == self.current
    }
}

impl Inner {
    pub(super) fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn bump_version(&self) {
        self.version.send_modify(|version| *version += 1);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .timers
            .abort_all();
    }
}

impl WeekCache {
    /// Creates an empty cache over `source`. No week is selected.
    pub fn new(source: Arc<dyn AppointmentSource>, config: CacheConfig) -> Self {
        let config = config.validated();
        let (version, _) = watch::channel(0);
        let state = CacheState {
            store: WeekStore::new(config.max_weeks),
            in_flight: HashMap::new(),
            next_ticket: 0,
            prefetch_queue: VecDeque::new(),
            current: None,
            error: None,
            last_temp_id: 0,
            timers: Timers::default(),
            memo: None,
        };

        Self {
            inner: Arc::new(Inner {
                source,
                config,
                state: Mutex::new(state),
                version,
            }),
        }
    }

    /// Makes the week containing `date` current.
    ///
    /// A fresh cached week is served immediately. A missing or stale week is
    /// fetched in the foreground; this future resolves once that fetch has
    /// been applied, or at once if another fetch of the week is in flight.
    /// Prefetching and the background refresh timer are re-armed either way.
    pub async fn select_week(&self, date: NaiveDate) {
        let key = WeekKey::from_date(date);
        let needs_fetch = {
            let mut state = self.inner.lock();
            state.current = Some(key);
            let ttl = self.inner.config.ttl;
            match state.store.peek(&key).map(|entry| entry.is_stale(ttl)) {
                Some(false) => {
                    state.store.touch(&key);
                    tracing::trace!(week = %key, "Serving week from cache");
                    false
                }
                Some(true) => {
                    tracing::debug!(week = %key, "Cached week is stale");
                    true
                }
                None => true,
            }
        };
        self.inner.bump_version();

        self.schedule_prefetch();
        self.schedule_background_refresh();

        if needs_fetch {
            self.fetch_week_data(key, false).await;
        }
    }

    /// Merged, start-time ordered events of the current week.
    ///
    /// Empty when no week is selected or the week is not resident. The
    /// result is reused until the version or the current week changes.
    pub fn appointments(&self) -> Arc<Vec<CalendarEvent>> {
        let mut state = self.inner.lock();
        let version = self.version();
        let Some(key) = state.current else {
            return Arc::default();
        };

        if let Some(memo) = &state.memo {
            if memo.key == key && memo.version == version {
                return Arc::clone(&memo.events);
            }
        }

        let events = Arc::new(
            state
                .store
                .peek(&key)
                .map(WeekEntry::merged)
                .unwrap_or_default(),
        );
        state.memo = Some(Memo {
            key,
            version,
            events: Arc::clone(&events),
        });
        events
    }

    /// True while the current week has no entry and a foreground fetch of it
    /// is in flight. Refetching a stale week does not count as loading.
    pub fn loading(&self) -> bool {
        let state = self.inner.lock();
        state.current.is_some_and(|key| {
            !state.store.contains(&key)
                && state
                    .in_flight
                    .get(&key)
                    .is_some_and(|fetch| !fetch.background)
        })
    }

    /// Message of the last foreground fetch failure, if not yet cleared.
    pub fn error(&self) -> Option<String> {
        self.inner.lock().error.clone()
    }

    /// Key of the selected week.
    pub fn current_week(&self) -> Option<WeekKey> {
        self.inner.lock().current
    }

    /// Change counter of the current week's visible state.
    pub fn version(&self) -> u64 {
        *self.inner.version.borrow()
    }

    /// Receiver notified on every version change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    /// Forces a foreground fetch of the current week.
    pub async fn refetch(&self) {
        let current = self.inner.lock().current;
        match current {
            Some(key) => self.fetch_week_data(key, false).await,
            None => tracing::trace!("No week selected, nothing to refetch"),
        }
    }

    /// Drops every cached week, pending prefetch and in-flight reservation.
    ///
    /// Fetches already running still complete and store their result, but
    /// no longer block a new fetch of the same week.
    pub fn clear_cache(&self) {
        {
            let mut state = self.inner.lock();
            state.store.clear();
            state.prefetch_queue.clear();
            state.in_flight.clear();
            state.memo = None;
        }
        self.inner.bump_version();
        tracing::info!("Week cache cleared");
    }

    /// Diagnostic snapshot of the resident weeks.
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.lock().store.stats()
    }

    /// Resident weeks from least to most recently used.
    pub fn resident_weeks(&self) -> Vec<WeekKey> {
        self.inner.lock().store.keys_by_recency()
    }

    /// Cancels the prefetch and refresh timers.
    ///
    /// Fetches in flight and optimistic expiries are not affected. The next
    /// [`WeekCache::select_week`] re-arms the timers.
    pub fn shutdown(&self) {
        self.inner.lock().timers.abort_all();
        tracing::debug!("Week cache timers stopped");
    }
}

impl std::fmt::Debug for WeekCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("WeekCache")
            .field("current", &state.current)
            .field("resident_weeks", &state.store.len())
            .field("in_flight", &state.in_flight.len())
            .field("version", &self.version())
            .finish()
    }
}
