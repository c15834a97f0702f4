use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior};

use super::week_cache::{Inner, WeekCache};

impl WeekCache {
    /// Re-arms the periodic refresh of the current week.
    ///
    /// Every `refresh_interval`, the current week is refetched in the
    /// background if it is resident and its last refresh attempt is at least
    /// `refresh_threshold` old. Calling this again replaces the timer.
    pub fn schedule_background_refresh(&self) {
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.config.refresh_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                inner.refresh_current_week();
            }
        });

        let previous = self.inner.lock().timers.refresh.replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl Inner {
    fn refresh_current_week(self: &Arc<Self>) {
        let threshold = self.config.refresh_threshold;
        let guard = {
            let mut state = self.lock();
            let Some(key) = state.current else {
                return;
            };
            let due = state
                .store
                .peek(&key)
                .is_some_and(|entry| entry.needs_refresh(threshold));
            if !due {
                tracing::trace!(week = %key, "Refresh not due");
                return;
            }
            state.store.mark_refresh_attempt(&key, Instant::now());
            tracing::debug!(week = %key, "Refreshing current week");
            self.begin_fetch(&mut state, key, true)
        };

        if let Some(guard) = guard {
            let inner = Arc::clone(self);
            tokio::spawn(async move {
                inner.run_fetch(guard).await;
            });
        }
    }
}
