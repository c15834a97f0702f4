use super::types::CalendarEvent;

/// Merges confirmed and optimistic events into one list sorted by start time.
///
/// Both inputs are left untouched. The sort is stable, so events with equal
/// start times keep confirmed-before-optimistic order.
pub fn merge_events(
    confirmed: &[CalendarEvent],
    optimistic: &[CalendarEvent],
) -> Vec<CalendarEvent> {
    let mut merged = Vec::with_capacity(confirmed.len() + optimistic.len());
    merged.extend_from_slice(confirmed);
    merged.extend_from_slice(optimistic);
    merged.sort_by_key(|event| event.start_time);
    merged
}
