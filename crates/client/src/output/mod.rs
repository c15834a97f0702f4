//! Output formatting functions.

pub mod json;
pub mod pretty;

use agenda_core::cache::CacheStats;
use agenda_core::calendar::CalendarEvent;
use agenda_core::week::WeekKey;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Snapshot of one week as served by the cache.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReport {
    pub week: WeekKey,
    pub appointments: Vec<CalendarEvent>,
    pub error: Option<String>,
    pub stats: CacheStats,
}

/// Format a value for output.
pub fn format_output<T: serde::Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

/// Format a week report in the requested format.
pub fn format_week_report(report: &WeekReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(report),
        OutputFormat::Pretty => pretty::format_week_report(report),
    }
}
