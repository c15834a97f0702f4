use super::types::{AppointmentStatus, CalendarEvent, RawAppointment, DEFAULT_APPOINTMENT_TYPE};

/// Builds the display name for a contact.
///
/// Joins whichever name fragments are present. Falls back to
/// `"Contact {id}"` when both are absent or blank.
pub fn contact_display_name(
    first_name: Option<&str>,
    last_name: Option<&str>,
    contact_id: i64,
) -> String {
    let name = [first_name, last_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        format!("Contact {}", contact_id)
    } else {
        name
    }
}

/// Converts a backend record into a confirmed calendar event.
pub fn event_from_raw(raw: RawAppointment) -> CalendarEvent {
    let contact_id = raw.contact_id.unwrap_or(0);
    let contact_name = contact_display_name(
        raw.contact_first_name.as_deref(),
        raw.contact_last_name.as_deref(),
        contact_id,
    );

    let status = match raw.status.as_deref() {
        Some(value) => AppointmentStatus::parse(value).unwrap_or_else(|| {
            tracing::trace!(appointment_id = raw.id, status = value, "Unknown appointment status");
            AppointmentStatus::default()
        }),
        None => AppointmentStatus::default(),
    };

    let appointment_type = raw
        .appointment_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_APPOINTMENT_TYPE.to_string());

    CalendarEvent {
        id: raw.id,
        contact_id,
        contact_name,
        listing_id: raw.listing_id,
        deal_id: raw.deal_id,
        prospect_id: raw.prospect_id,
        property_street: raw.property_street,
        start_time: raw.start_time,
        end_time: raw.end_time,
        status,
        appointment_type,
        trip_time: raw.trip_time,
        notes: raw.notes,
        agent_name: raw.agent_name,
        is_optimistic: false,
    }
}

/// Converts a batch of backend records.
pub fn events_from_raw(raw: Vec<RawAppointment>) -> Vec<CalendarEvent> {
    raw.into_iter().map(event_from_raw).collect()
}
