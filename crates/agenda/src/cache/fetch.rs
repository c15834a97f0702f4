//! Fetch coordination: at most one fetch per week, results applied once.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::time::Instant;

use agenda_core::cache::SourceError;
use agenda_core::calendar::{events_from_raw, CalendarEvent};
use agenda_core::week::{WeekKey, WeekRange};

use super::week_cache::{CacheState, InFlight, Inner, WeekCache};

/// Reservation of a week in the in-flight registry.
///
/// Dropping the guard releases the reservation, whether the fetch
/// completed or its future was dropped.
pub(super) struct InFlightGuard {
    inner: Arc<Inner>,
    key: WeekKey,
    ticket: u64,
    background: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        if state
            .in_flight
            .get(&self.key)
            .is_some_and(|fetch| fetch.ticket == self.ticket)
        {
            state.in_flight.remove(&self.key);
        }
    }
}

impl Inner {
    /// Reserves `key` for fetching. Returns `None` if it is already in flight.
    ///
    /// The returned guard must not be dropped while `state` is locked.
    pub(super) fn begin_fetch(
        self: &Arc<Self>,
        state: &mut CacheState,
        key: WeekKey,
        background: bool,
    ) -> Option<InFlightGuard> {
        if state.in_flight.contains_key(&key) {
            tracing::trace!(week = %key, background, "Fetch already in flight");
            return None;
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.in_flight.insert(key, InFlight { ticket, background });

        Some(InFlightGuard {
            inner: Arc::clone(self),
            key,
            ticket,
            background,
        })
    }

    /// Fetches the reserved week and applies the outcome.
    pub(super) async fn run_fetch(&self, guard: InFlightGuard) {
        let key = guard.key;
        let background = guard.background;
        let range = WeekRange::for_key(&key);

        tracing::debug!(week = %key, background, "Fetching week");
        let result = self
            .source
            .fetch_appointments_by_range(range.start, range.end)
            .await
            .map(events_from_raw);

        self.apply_fetch_result(key, background, result);
        drop(guard);
    }

    /// Stores a fetch outcome and notifies observers of the current week.
    ///
    /// Failures of background fetches are logged only. Failures of
    /// foreground fetches become the visible error, which the next
    /// successful foreground fetch of the current week clears.
    pub(super) fn apply_fetch_result(
        &self,
        key: WeekKey,
        background: bool,
        result: Result<Vec<CalendarEvent>, SourceError>,
    ) {
        let notify = {
            let mut state = self.lock();
            let is_current = state.current == Some(key);

            match result {
                Ok(events) => {
                    let count = events.len();
                    let evicted = state.store.store_confirmed(key, events, Instant::now());
                    if is_current && !background {
                        state.error = None;
                    }
                    tracing::debug!(week = %key, count, background, "Week cached");
                    is_current || state.is_current(evicted)
                }
                Err(err) if background => {
                    tracing::warn!(week = %key, error = %err, "Background fetch failed");
                    false
                }
                Err(err) => {
                    tracing::error!(week = %key, error = %err, "Failed to fetch week");
                    state.error = Some(err.user_message());
                    true
                }
            }
        };

        if notify {
            self.bump_version();
        }
    }
}

impl WeekCache {
    /// Fetches `key` unless a fetch of it is already in flight.
    ///
    /// The key carries the week's Monday, which determines the requested
    /// range. Background fetches never touch the visible error state.
    pub async fn fetch_week_data(&self, key: WeekKey, background: bool) {
        let guard = {
            let mut state = self.inner.lock();
            self.inner.begin_fetch(&mut state, key, background)
        };

        if let Some(guard) = guard {
            self.inner.run_fetch(guard).await;
        }
    }

    /// Fetches an arbitrary window and stores it under the week of `start`.
    ///
    /// Returns the fetched events, or an empty list on failure. Windows
    /// spanning several weeks are still stored under a single week.
    pub async fn fetch_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<CalendarEvent> {
        let key = WeekKey::from_date(start.date());
        tracing::debug!(week = %key, %start, %end, "Fetching date range");

        let result = self
            .inner
            .source
            .fetch_appointments_by_range(start, end)
            .await
            .map(events_from_raw);
        let events = result.as_ref().cloned().unwrap_or_default();

        self.inner.apply_fetch_result(key, false, result);
        events
    }
}
