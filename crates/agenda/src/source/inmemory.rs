//! In-memory appointment source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use agenda_core::cache::{AppointmentSource, Result, SourceError};
use agenda_core::calendar::RawAppointment;

/// Appointment source backed by a vector, for demos and tests.
///
/// Clones share the same data, failure switch and call counter.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    appointments: Arc<RwLock<Vec<RawAppointment>>>,
    failure: Arc<RwLock<Option<SourceError>>>,
    calls: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source serving `appointments`.
    pub fn with_appointments(appointments: Vec<RawAppointment>) -> Self {
        Self {
            appointments: Arc::new(RwLock::new(appointments)),
            ..Self::default()
        }
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds one appointment.
    pub async fn insert(&self, appointment: RawAppointment) {
        self.appointments.write().await.push(appointment);
    }

    /// Makes every subsequent fetch fail with `failure`, or succeed again on `None`.
    pub async fn set_failure(&self, failure: Option<SourceError>) {
        *self.failure.write().await = failure;
    }

    /// Number of fetches issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppointmentSource for InMemorySource {
    async fn fetch_appointments_by_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawAppointment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(failure) = self.failure.read().await.clone() {
            return Err(failure);
        }

        let appointments = self.appointments.read().await;
        let mut matching: Vec<RawAppointment> = appointments
            .iter()
            .filter(|a| a.start_time >= start && a.start_time <= end)
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.start_time);
        Ok(matching)
    }
}
