//! Progressive prefetching of the weeks around the current one.

use std::sync::{Arc, Weak};

use agenda_core::week::plan_prefetch;

use super::week_cache::{Inner, WeekCache};

impl WeekCache {
    /// Re-arms prefetching for the current week.
    ///
    /// After the debounce delay the queue is replaced by a fresh plan of the
    /// surrounding weeks that are missing or stale, then drained in passes
    /// until empty. Calling this again cancels the pending plan.
    pub fn schedule_prefetch(&self) {
        let weak = Arc::downgrade(&self.inner);
        let debounce = self.inner.config.prefetch_debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            run_prefetch(weak).await;
        });

        let previous = self.inner.lock().timers.prefetch.replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Runs one drain pass over the prefetch queue.
    ///
    /// Returns the number of requests still queued.
    pub fn process_prefetch_queue(&self) -> usize {
        self.inner.process_prefetch_queue()
    }

    /// Number of weeks waiting to be prefetched.
    pub fn pending_prefetch(&self) -> usize {
        self.inner.lock().prefetch_queue.len()
    }
}

async fn run_prefetch(weak: Weak<Inner>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    if inner.plan_prefetch_queue() == 0 {
        return;
    }
    let retry = inner.config.prefetch_retry;
    drop(inner);

    loop {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.process_prefetch_queue() == 0 {
            return;
        }
        drop(inner);
        tokio::time::sleep(retry).await;
    }
}

impl Inner {
    /// Replaces the queue with the plan for the current week.
    fn plan_prefetch_queue(&self) -> usize {
        let ttl = self.config.ttl;
        let mut state = self.lock();
        let Some(current) = state.current else {
            return 0;
        };

        let plan = plan_prefetch(&current, |key| {
            state.store.peek(key).is_none_or(|entry| entry.is_stale(ttl))
        });
        let queued = plan.len();
        state.prefetch_queue = plan.into();

        tracing::debug!(week = %current, queued, "Prefetch planned");
        queued
    }

    /// Starts background fetches from the head of the queue while fewer than
    /// `prefetch_concurrency` fetches are in flight.
    ///
    /// Requests for weeks already in flight or already fresh are dropped.
    fn process_prefetch_queue(self: &Arc<Self>) -> usize {
        let ttl = self.config.ttl;
        let limit = self.config.prefetch_concurrency;
        let mut started = Vec::new();

        let remaining = {
            let mut state = self.lock();
            while state.in_flight.len() < limit {
                let Some(request) = state.prefetch_queue.pop_front() else {
                    break;
                };
                if state
                    .store
                    .peek(&request.key)
                    .is_some_and(|entry| !entry.is_stale(ttl))
                {
                    tracing::trace!(week = %request.key, "Prefetch skipped, week is fresh");
                    continue;
                }
                if let Some(guard) = self.begin_fetch(&mut state, request.key, true) {
                    tracing::trace!(
                        week = %request.key,
                        priority = request.priority,
                        "Prefetching week"
                    );
                    started.push(guard);
                }
            }
            state.prefetch_queue.len()
        };

        for guard in started {
            let inner = Arc::clone(self);
            tokio::spawn(async move {
                inner.run_fetch(guard).await;
            });
        }
        remaining
    }
}
