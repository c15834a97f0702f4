//! LRU-bounded store of week entries.
//!
//! The `LruCache` recency list doubles as the access-order ledger: reads
//! through [`WeekStore::touch`] and writes of confirmed data promote a week,
//! and inserting past capacity evicts the least recently used one.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use agenda_core::cache::CacheStats;
use agenda_core::calendar::{merge_events, CalendarEvent, EventPatch};
use agenda_core::week::WeekKey;

/// Cached data for one week.
#[derive(Debug, Clone)]
pub struct WeekEntry {
    /// Confirmed events from the last successful fetch.
    pub appointments: Vec<CalendarEvent>,
    /// Locally created events not yet confirmed by the backend.
    pub optimistic_events: Vec<CalendarEvent>,
    /// When `appointments` was last written.
    pub timestamp: Instant,
    /// When a background refresh was last attempted.
    pub last_refresh: Instant,
    /// Set on entries created only to hold optimistic events.
    pub marked_stale: bool,
}

impl WeekEntry {
    fn confirmed(appointments: Vec<CalendarEvent>, now: Instant) -> Self {
        Self {
            appointments,
            optimistic_events: Vec::new(),
            timestamp: now,
            last_refresh: now,
            marked_stale: false,
        }
    }

    fn placeholder(now: Instant) -> Self {
        Self {
            appointments: Vec::new(),
            optimistic_events: Vec::new(),
            timestamp: now,
            last_refresh: now,
            marked_stale: true,
        }
    }

    /// Returns true if the entry should be refetched before being trusted.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.marked_stale || self.timestamp.elapsed() > ttl
    }

    /// Returns true if the last refresh attempt is at least `threshold` old.
    pub fn needs_refresh(&self, threshold: Duration) -> bool {
        self.last_refresh.elapsed() >= threshold
    }

    /// Confirmed and optimistic events merged by start time.
    pub fn merged(&self) -> Vec<CalendarEvent> {
        merge_events(&self.appointments, &self.optimistic_events)
    }
}

/// Week entries with LRU eviction.
#[derive(Debug)]
pub struct WeekStore {
    weeks: LruCache<WeekKey, WeekEntry>,
}

impl WeekStore {
    /// Creates a store holding at most `max_weeks` weeks.
    ///
    /// A zero capacity is raised to one.
    pub fn new(max_weeks: usize) -> Self {
        let capacity = NonZeroUsize::new(max_weeks).unwrap_or_else(|| {
            tracing::warn!("Week store capacity of 0 raised to 1");
            NonZeroUsize::MIN
        });
        Self {
            weeks: LruCache::new(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn contains(&self, key: &WeekKey) -> bool {
        self.weeks.contains(key)
    }

    /// Returns the entry without affecting recency.
    pub fn peek(&self, key: &WeekKey) -> Option<&WeekEntry> {
        self.weeks.peek(key)
    }

    /// Marks `key` as most recently used. Returns false if it is not resident.
    pub fn touch(&mut self, key: &WeekKey) -> bool {
        if !self.weeks.contains(key) {
            return false;
        }
        self.weeks.promote(key);
        true
    }

    /// Replaces the confirmed events of `key`, keeping its optimistic overlay.
    ///
    /// The week becomes most recently used. Returns the evicted week, if any.
    pub fn store_confirmed(
        &mut self,
        key: WeekKey,
        appointments: Vec<CalendarEvent>,
        now: Instant,
    ) -> Option<WeekKey> {
        if let Some(entry) = self.weeks.get_mut(&key) {
            entry.appointments = appointments;
            entry.timestamp = now;
            entry.last_refresh = now;
            entry.marked_stale = false;
            return None;
        }
        self.insert(key, WeekEntry::confirmed(appointments, now))
    }

    /// Adds an optimistic event to its week's overlay.
    ///
    /// A resident week keeps its recency. A missing week is created empty and
    /// marked stale. Returns the evicted week, if any.
    pub fn push_optimistic(
        &mut self,
        key: WeekKey,
        event: CalendarEvent,
        now: Instant,
    ) -> Option<WeekKey> {
        if let Some(entry) = self.weeks.peek_mut(&key) {
            entry.optimistic_events.push(event);
            return None;
        }
        let mut entry = WeekEntry::placeholder(now);
        entry.optimistic_events.push(event);
        self.insert(key, entry)
    }

    /// Removes the optimistic event `id` from whichever week holds it.
    ///
    /// Returns the week it was removed from.
    pub fn remove_optimistic(&mut self, id: i64) -> Option<WeekKey> {
        for (key, entry) in self.weeks.iter_mut() {
            let before = entry.optimistic_events.len();
            entry.optimistic_events.retain(|event| event.id != id);
            if entry.optimistic_events.len() != before {
                return Some(*key);
            }
        }
        None
    }

    /// Applies `patch` to the optimistic event `id` in place.
    ///
    /// Returns the week holding the event.
    pub fn update_optimistic(&mut self, id: i64, patch: EventPatch) -> Option<WeekKey> {
        for (key, entry) in self.weeks.iter_mut() {
            if let Some(event) = entry.optimistic_events.iter_mut().find(|e| e.id == id) {
                event.apply(patch);
                return Some(*key);
            }
        }
        None
    }

    /// Records a refresh attempt on `key` without affecting recency.
    pub fn mark_refresh_attempt(&mut self, key: &WeekKey, now: Instant) {
        if let Some(entry) = self.weeks.peek_mut(key) {
            entry.last_refresh = now;
        }
    }

    /// Resident weeks from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<WeekKey> {
        self.weeks.iter().rev().map(|(key, _)| *key).collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats::from_weeks(self.weeks.iter().map(|(key, entry)| {
            (*key, entry.appointments.len(), entry.optimistic_events.len())
        }))
    }

    pub fn clear(&mut self) {
        self.weeks.clear();
    }

    fn insert(&mut self, key: WeekKey, entry: WeekEntry) -> Option<WeekKey> {
        match self.weeks.push(key, entry) {
            Some((evicted, _)) if evicted != key => {
                tracing::debug!(week = %evicted, "Evicted least recently used week");
                Some(evicted)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::calendar::{event_from_raw, RawAppointment};
    use chrono::{NaiveDate, NaiveDateTime};

    fn base_week() -> WeekKey {
        WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn at(key: WeekKey, hour: u32) -> NaiveDateTime {
        key.start_date().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn confirmed_event(id: i64, key: WeekKey, hour: u32) -> CalendarEvent {
        event_from_raw(RawAppointment::new(id, at(key, hour), at(key, hour + 1)))
    }

    fn optimistic_event(id: i64, key: WeekKey, hour: u32) -> CalendarEvent {
        EventPatch::new()
            .with_start(at(key, hour))
            .into_optimistic(id, at(key, 0))
    }

    #[test]
    fn test_store_is_bounded_and_evicts_least_recently_used() {
        let mut store = WeekStore::new(26);
        let now = Instant::now();

        for offset in 0..26 {
            assert_eq!(store.store_confirmed(base_week().shift(offset), vec![], now), None);
        }
        assert_eq!(store.len(), 26);

        let evicted = store.store_confirmed(base_week().shift(26), vec![], now);

        assert_eq!(evicted, Some(base_week()));
        assert_eq!(store.len(), 26);
        assert!(!store.contains(&base_week()));
    }

    #[test]
    fn test_touch_protects_from_eviction() {
        let mut store = WeekStore::new(3);
        let now = Instant::now();
        for offset in 0..3 {
            store.store_confirmed(base_week().shift(offset), vec![], now);
        }

        assert!(store.touch(&base_week()));
        let evicted = store.store_confirmed(base_week().shift(3), vec![], now);

        assert_eq!(evicted, Some(base_week().shift(1)));
        assert_eq!(
            store.keys_by_recency(),
            vec![base_week().shift(2), base_week(), base_week().shift(3)]
        );
    }

    #[test]
    fn test_touch_missing_week() {
        let mut store = WeekStore::new(3);

        assert!(!store.touch(&base_week()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_confirmed_keeps_optimistic_overlay() {
        let mut store = WeekStore::new(4);
        let now = Instant::now();
        let key = base_week();
        store.push_optimistic(key, optimistic_event(-1, key, 9), now);

        store.store_confirmed(key, vec![confirmed_event(1, key, 8)], now);

        let entry = store.peek(&key).unwrap();
        assert_eq!(entry.appointments.len(), 1);
        assert_eq!(entry.optimistic_events.len(), 1);
        assert!(!entry.marked_stale);
        let ids: Vec<i64> = entry.merged().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, -1]);
    }

    #[test]
    fn test_push_optimistic_creates_stale_entry() {
        let mut store = WeekStore::new(4);
        let key = base_week();

        store.push_optimistic(key, optimistic_event(-1, key, 9), Instant::now());

        let entry = store.peek(&key).unwrap();
        assert!(entry.appointments.is_empty());
        assert!(entry.is_stale(Duration::from_secs(1800)));
    }

    #[test]
    fn test_push_optimistic_keeps_recency() {
        let mut store = WeekStore::new(4);
        let now = Instant::now();
        store.store_confirmed(base_week(), vec![], now);
        store.store_confirmed(base_week().shift(1), vec![], now);

        store.push_optimistic(base_week(), optimistic_event(-1, base_week(), 9), now);

        assert_eq!(
            store.keys_by_recency(),
            vec![base_week(), base_week().shift(1)]
        );
    }

    #[test]
    fn test_remove_optimistic_scans_all_weeks() {
        let mut store = WeekStore::new(4);
        let now = Instant::now();
        let other = base_week().shift(2);
        store.push_optimistic(base_week(), optimistic_event(-1, base_week(), 9), now);
        store.push_optimistic(other, optimistic_event(-2, other, 9), now);

        assert_eq!(store.remove_optimistic(-2), Some(other));
        assert_eq!(store.remove_optimistic(-2), None);
        assert!(store.peek(&other).unwrap().optimistic_events.is_empty());
        assert_eq!(store.peek(&base_week()).unwrap().optimistic_events.len(), 1);
    }

    #[test]
    fn test_update_optimistic_applies_patch() {
        let mut store = WeekStore::new(4);
        let key = base_week();
        store.push_optimistic(key, optimistic_event(-1, key, 9), Instant::now());

        let updated = store.update_optimistic(-1, EventPatch::new().with_notes("llamar antes"));

        assert_eq!(updated, Some(key));
        let entry = store.peek(&key).unwrap();
        assert_eq!(
            entry.optimistic_events[0].notes.as_deref(),
            Some("llamar antes")
        );
        assert!(entry.optimistic_events[0].is_optimistic);
        assert_eq!(store.update_optimistic(-7, EventPatch::new()), None);
    }

    #[test]
    fn test_stats() {
        let mut store = WeekStore::new(4);
        let now = Instant::now();
        let key = base_week();
        store.store_confirmed(
            key,
            vec![confirmed_event(1, key, 8), confirmed_event(2, key, 10)],
            now,
        );
        store.push_optimistic(key.shift(3), optimistic_event(-1, key.shift(3), 9), now);

        let stats = store.stats();

        assert_eq!(stats.total_weeks, 2);
        assert_eq!(stats.oldest_week, Some(key));
        assert_eq!(stats.newest_week, Some(key.shift(3)));
        assert_eq!(stats.total_events, 2);
        assert_eq!(stats.optimistic_events, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_staleness_follows_ttl() {
        let mut store = WeekStore::new(4);
        let ttl = Duration::from_secs(1800);
        store.store_confirmed(base_week(), vec![], Instant::now());

        tokio::time::advance(Duration::from_secs(1799)).await;
        assert!(!store.peek(&base_week()).unwrap().is_stale(ttl));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.peek(&base_week()).unwrap().is_stale(ttl));
    }

    #[test]
    fn test_clear() {
        let mut store = WeekStore::new(4);
        store.store_confirmed(base_week(), vec![], Instant::now());

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.stats().total_weeks, 0);
    }
}
