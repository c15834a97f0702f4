//! Optimistic events: shown immediately, dropped after a fixed lifetime.

use std::sync::Arc;

use chrono::Local;
use tokio::time::Instant;

use agenda_core::calendar::EventPatch;
use agenda_core::week::WeekKey;

use super::week_cache::{Inner, WeekCache};

impl WeekCache {
    /// Adds a locally created event to its week and returns its temporary id.
    ///
    /// Unset fields take defaults: start now, one hour long, scheduled,
    /// of type "Visita". The event is removed automatically after
    /// `optimistic_ttl` unless removed earlier.
    pub fn add_optimistic_event(&self, patch: EventPatch) -> i64 {
        let now = Local::now();
        let (temp_id, key, notify) = {
            let mut state = self.inner.lock();
            let temp_id = state.next_temp_id(now.timestamp_millis());
            let event = patch.into_optimistic(temp_id, now.naive_local());
            let key = WeekKey::from_date(event.start_time.date());
            let evicted = state.store.push_optimistic(key, event, Instant::now());
            let notify = state.current == Some(key) || state.is_current(evicted);
            (temp_id, key, notify)
        };
        if notify {
            self.inner.bump_version();
        }

        tracing::debug!(temp_id, week = %key, "Optimistic event added");
        self.schedule_optimistic_expiry(temp_id);
        temp_id
    }

    /// Removes an optimistic event. Returns false if no week holds it.
    pub fn remove_optimistic_event(&self, temp_id: i64) -> bool {
        self.inner.remove_optimistic(temp_id)
    }

    /// Applies `patch` to an optimistic event in place.
    ///
    /// The event stays in the week it was added to, even if its start time
    /// moves elsewhere. Returns false if no week holds it.
    pub fn update_optimistic_event(&self, temp_id: i64, patch: EventPatch) -> bool {
        let updated = {
            let mut state = self.inner.lock();
            state
                .store
                .update_optimistic(temp_id, patch)
                .map(|week| state.current == Some(week))
        };

        match updated {
            Some(notify) => {
                if notify {
                    self.inner.bump_version();
                }
                tracing::debug!(temp_id, "Optimistic event updated");
                true
            }
            None => {
                tracing::trace!(temp_id, "Optimistic event not found for update");
                false
            }
        }
    }

    fn schedule_optimistic_expiry(&self, temp_id: i64) {
        let weak = Arc::downgrade(&self.inner);
        let lifetime = self.inner.config.optimistic_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            if let Some(inner) = weak.upgrade() {
                if inner.remove_optimistic(temp_id) {
                    tracing::debug!(temp_id, "Optimistic event expired");
                }
            }
        });
    }
}

impl Inner {
    fn remove_optimistic(&self, temp_id: i64) -> bool {
        let removed = {
            let mut state = self.lock();
            state
                .store
                .remove_optimistic(temp_id)
                .map(|week| state.current == Some(week))
        };

        match removed {
            Some(notify) => {
                if notify {
                    self.bump_version();
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use agenda_core::calendar::{AppointmentStatus, EventPatch, RawAppointment};
    use agenda_core::week::WeekKey;
    use chrono::{Local, NaiveDate, NaiveDateTime};

    use crate::{CacheConfig, InMemorySource, WeekCache};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    async fn cache_on_week(day: u32) -> (InMemorySource, WeekCache) {
        let source = InMemorySource::with_appointments(vec![
            RawAppointment::new(1, at(12, 9), at(12, 10)),
            RawAppointment::new(2, at(14, 16), at(14, 17)),
        ]);
        let cache = WeekCache::new(Arc::new(source.clone()), CacheConfig::default());
        cache.select_week(at(day, 0).date()).await;
        (source, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_event_merged_by_start_time() {
        let (_source, cache) = cache_on_week(15).await;
        let version = cache.version();

        let temp_id = cache.add_optimistic_event(
            EventPatch::new()
                .with_start(at(13, 11))
                .with_contact(7, "Ana Ruiz"),
        );

        assert!(temp_id < 0);
        assert!(cache.version() > version);
        let events = cache.appointments();
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, temp_id, 2]);
        let added = &events[1];
        assert!(added.is_optimistic);
        assert_eq!(added.end_time, at(13, 12));
        assert_eq!(added.status, AppointmentStatus::Scheduled);
        assert_eq!(added.appointment_type, "Visita");
        assert_eq!(added.contact_name, "Ana Ruiz");
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_event_expires() {
        let (_source, cache) = cache_on_week(15).await;
        let temp_id = cache.add_optimistic_event(EventPatch::new().with_start(at(13, 11)));

        tokio::time::sleep(Duration::from_millis(29_900)).await;
        assert!(cache.appointments().iter().any(|e| e.id == temp_id));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(cache.appointments().iter().all(|e| e.id != temp_id));
        assert_eq!(cache.cache_stats().optimistic_events, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_before_expiry() {
        let (_source, cache) = cache_on_week(15).await;
        let temp_id = cache.add_optimistic_event(EventPatch::new().with_start(at(13, 11)));

        assert!(cache.remove_optimistic_event(temp_id));
        assert!(!cache.remove_optimistic_event(temp_id));
        assert_eq!(cache.appointments().len(), 2);

        // Expiry of an already removed event is a no-op
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(cache.appointments().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_in_place() {
        let (_source, cache) = cache_on_week(15).await;
        let temp_id = cache.add_optimistic_event(EventPatch::new().with_start(at(13, 11)));

        assert!(cache.update_optimistic_event(
            temp_id,
            EventPatch::new()
                .with_status(AppointmentStatus::Completed)
                .with_notes("firmado"),
        ));
        assert!(!cache.update_optimistic_event(-1, EventPatch::new()));

        let events = cache.appointments();
        let updated = events.iter().find(|e| e.id == temp_id).unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);
        assert_eq!(updated.notes.as_deref(), Some("firmado"));
        assert!(updated.is_optimistic);
    }

    #[tokio::test(start_paused = true)]
    async fn test_temp_ids_unique_and_decreasing() {
        let (_source, cache) = cache_on_week(15).await;

        let ids: Vec<i64> = (0..5)
            .map(|_| cache.add_optimistic_event(EventPatch::new().with_start(at(13, 11))))
            .collect();

        assert!(ids.iter().all(|id| *id < 0));
        assert!(ids.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_for_unloaded_week_creates_stale_entry() {
        let (source, cache) = cache_on_week(15).await;
        let later = at(27, 10);

        let temp_id = cache.add_optimistic_event(EventPatch::new().with_start(later));

        let stats = cache.cache_stats();
        assert_eq!(stats.optimistic_events, 1);
        assert!(cache
            .resident_weeks()
            .contains(&WeekKey::from_date(later.date())));

        // Selecting that week still fetches it, keeping the overlay
        let calls = source.call_count();
        cache.select_week(later.date()).await;
        assert_eq!(source.call_count(), calls + 1);
        assert!(cache.appointments().iter().any(|e| e.id == temp_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_defaults_start_now() {
        let (_source, cache) = cache_on_week(15).await;
        let before = Local::now().naive_local();

        let temp_id = cache.add_optimistic_event(EventPatch::new());

        cache.select_week(before.date()).await;
        let events = cache.appointments();
        let event = events.iter().find(|e| e.id == temp_id).unwrap();
        assert!(event.start_time >= before - chrono::Duration::seconds(1));
        assert_eq!(event.duration(), chrono::Duration::hours(1));
    }
}
