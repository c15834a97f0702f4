use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default label for appointments without an explicit type.
pub const DEFAULT_APPOINTMENT_TYPE: &str = "Visita";

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
    NoShow,
}

impl AppointmentStatus {
    /// Parses a backend status string.
    ///
    /// Matching is case-insensitive and tolerates `no_show` / `no-show`.
    /// Returns `None` for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "rescheduled" => Some(Self::Rescheduled),
            "noshow" => Some(Self::NoShow),
            _ => None,
        }
    }

    /// Returns the canonical name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Rescheduled => "Rescheduled",
            Self::NoShow => "NoShow",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appointment record as returned by the backend range query.
///
/// Names and the property street come from joined tables and may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAppointment {
    pub id: i64,
    #[serde(default)]
    pub contact_id: Option<i64>,
    #[serde(default)]
    pub listing_id: Option<i64>,
    #[serde(default)]
    pub deal_id: Option<i64>,
    #[serde(default)]
    pub prospect_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub contact_first_name: Option<String>,
    #[serde(default)]
    pub contact_last_name: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub property_street: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub appointment_type: Option<String>,
    /// Travel time to the appointment, in minutes.
    #[serde(default)]
    pub trip_time: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RawAppointment {
    /// Creates a bare record with only the required fields set.
    pub fn new(id: i64, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id,
            contact_id: None,
            listing_id: None,
            deal_id: None,
            prospect_id: None,
            start_time,
            end_time,
            contact_first_name: None,
            contact_last_name: None,
            agent_name: None,
            property_street: None,
            status: None,
            appointment_type: None,
            trip_time: None,
            notes: None,
        }
    }

    /// Sets the contact and its name fragments.
    pub fn with_contact(
        mut self,
        contact_id: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.contact_id = Some(contact_id);
        self.contact_first_name = Some(first_name.into());
        self.contact_last_name = Some(last_name.into());
        self
    }

    /// Sets the listing reference and its street.
    pub fn with_listing(mut self, listing_id: i64, street: impl Into<String>) -> Self {
        self.listing_id = Some(listing_id);
        self.property_street = Some(street.into());
        self
    }

    /// Sets the raw status string.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the appointment type label.
    pub fn with_type(mut self, appointment_type: impl Into<String>) -> Self {
        self.appointment_type = Some(appointment_type.into());
        self
    }

    /// Sets the assigned agent name.
    pub fn with_agent(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = Some(agent_name.into());
        self
    }

    /// Sets free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A scheduled appointment as presented to the calendar view.
///
/// Server-confirmed events carry positive ids. Optimistic events carry
/// negative temporary ids and `is_optimistic == true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub contact_id: i64,
    pub contact_name: String,
    pub listing_id: Option<i64>,
    pub deal_id: Option<i64>,
    pub prospect_id: Option<i64>,
    pub property_street: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub appointment_type: String,
    pub trip_time: Option<i32>,
    pub notes: Option<String>,
    pub agent_name: Option<String>,
    pub is_optimistic: bool,
}

impl CalendarEvent {
    /// Returns true if this event has not been persisted by the server.
    pub fn is_temporary(&self) -> bool {
        self.is_optimistic || self.id < 0
    }

    /// Length of the appointment.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Applies every `Some` field of the patch to this event.
    pub fn apply(&mut self, patch: EventPatch) {
        let EventPatch {
            contact_id,
            contact_name,
            listing_id,
            deal_id,
            prospect_id,
            property_street,
            start_time,
            end_time,
            status,
            appointment_type,
            trip_time,
            notes,
            agent_name,
        } = patch;

        if let Some(v) = contact_id {
            self.contact_id = v;
        }
        if let Some(v) = contact_name {
            self.contact_name = v;
        }
        if let Some(v) = listing_id {
            self.listing_id = Some(v);
        }
        if let Some(v) = deal_id {
            self.deal_id = Some(v);
        }
        if let Some(v) = prospect_id {
            self.prospect_id = Some(v);
        }
        if let Some(v) = property_street {
            self.property_street = Some(v);
        }
        if let Some(v) = start_time {
            self.start_time = v;
        }
        if let Some(v) = end_time {
            self.end_time = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = appointment_type {
            self.appointment_type = v;
        }
        if let Some(v) = trip_time {
            self.trip_time = Some(v);
        }
        if let Some(v) = notes {
            self.notes = Some(v);
        }
        if let Some(v) = agent_name {
            self.agent_name = Some(v);
        }
    }
}

/// A partial calendar event.
///
/// Used to describe a client-predicted event (missing fields get defaults)
/// and to update one in place (only `Some` fields are applied).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub contact_id: Option<i64>,
    pub contact_name: Option<String>,
    pub listing_id: Option<i64>,
    pub deal_id: Option<i64>,
    pub prospect_id: Option<i64>,
    pub property_street: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub status: Option<AppointmentStatus>,
    pub appointment_type: Option<String>,
    pub trip_time: Option<i32>,
    pub notes: Option<String>,
    pub agent_name: Option<String>,
}

impl EventPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time window.
    pub fn with_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Sets only the start time.
    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Sets the contact reference and display name.
    pub fn with_contact(mut self, contact_id: i64, name: impl Into<String>) -> Self {
        self.contact_id = Some(contact_id);
        self.contact_name = Some(name.into());
        self
    }

    /// Sets the listing reference.
    pub fn with_listing(mut self, listing_id: i64) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the type label.
    pub fn with_type(mut self, appointment_type: impl Into<String>) -> Self {
        self.appointment_type = Some(appointment_type.into());
        self
    }

    /// Sets notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builds an optimistic event from this patch.
    ///
    /// Defaults: start = `now`, end = start + 1h, status = Scheduled,
    /// type = "Visita", contact = 0.
    pub fn into_optimistic(self, temp_id: i64, now: NaiveDateTime) -> CalendarEvent {
        let start_time = self.start_time.unwrap_or(now);
        let end_time = self
            .end_time
            .unwrap_or_else(|| start_time + Duration::hours(1));
        let contact_id = self.contact_id.unwrap_or(0);
        let contact_name = self
            .contact_name
            .unwrap_or_else(|| super::contact_display_name(None, None, contact_id));

        CalendarEvent {
            id: temp_id,
            contact_id,
            contact_name,
            listing_id: self.listing_id,
            deal_id: self.deal_id,
            prospect_id: self.prospect_id,
            property_street: self.property_street,
            start_time,
            end_time,
            status: self.status.unwrap_or_default(),
            appointment_type: self
                .appointment_type
                .unwrap_or_else(|| DEFAULT_APPOINTMENT_TYPE.to_string()),
            trip_time: self.trip_time,
            notes: self.notes,
            agent_name: self.agent_name,
            is_optimistic: true,
        }
    }
}
