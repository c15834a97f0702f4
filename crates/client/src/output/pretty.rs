//! Pretty output formatting.

use agenda_core::cache::CacheStats;
use agenda_core::calendar::CalendarEvent;

use super::WeekReport;

/// Format an event for display.
pub fn format_event(event: &CalendarEvent) -> String {
    let marker = if event.is_temporary() { " (pending)" } else { "" };
    let mut output = format!(
        "{} {}-{} {} [{}]{}\n  ID: {}\n  Status: {}",
        event.start_time.format("%a %d/%m"),
        event.start_time.format("%H:%M"),
        event.end_time.format("%H:%M"),
        event.contact_name,
        event.appointment_type,
        marker,
        event.id,
        event.status
    );
    if let Some(street) = &event.property_street {
        output.push_str(&format!("\n  Property: {}", street));
    }
    if let Some(agent) = &event.agent_name {
        output.push_str(&format!("\n  Agent: {}", agent));
    }
    if let Some(minutes) = event.trip_time {
        output.push_str(&format!("\n  Trip: {} min", minutes));
    }
    if let Some(notes) = &event.notes {
        output.push_str(&format!("\n  Notes: {}", notes));
    }
    output
}

/// Format events for display.
pub fn format_events(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return "No appointments found.".to_string();
    }
    let mut output = format!("APPOINTMENTS ({})\n", events.len());
    output.push_str(&"-".repeat(40));
    for event in events {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format cache stats for display.
pub fn format_stats(stats: &CacheStats) -> String {
    let bounds = match (&stats.oldest_week, &stats.newest_week) {
        (Some(oldest), Some(newest)) => format!("{} .. {}", oldest, newest),
        _ => "-".to_string(),
    };
    format!(
        "Cache: {} weeks ({}), {} events, {} pending",
        stats.total_weeks, bounds, stats.total_events, stats.optimistic_events
    )
}

/// Format a week report for display.
pub fn format_week_report(report: &WeekReport) -> String {
    let mut output = format!("WEEK {}\n", report.week);
    if let Some(error) = &report.error {
        output.push_str(&format!("Error: {}\n", error));
    }
    output.push_str(&format_events(&report.appointments));
    output.push('\n');
    output.push_str(&format_stats(&report.stats));
    output
}
