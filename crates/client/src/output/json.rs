//! JSON output formatting.

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::WeekReport;
    use agenda_core::cache::CacheStats;
    use agenda_core::week::WeekKey;
    use chrono::NaiveDate;

    #[test]
    fn test_week_report_json_shape() {
        let week = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let report = WeekReport {
            week,
            appointments: vec![],
            error: Some("Error al cargar las citas".to_string()),
            stats: CacheStats::from_weeks(vec![(week, 0, 0)]),
        };

        let value: serde_json::Value = serde_json::from_str(&format_json(&report)).unwrap();

        assert_eq!(value["week"], "2024-W11");
        assert_eq!(value["error"], "Error al cargar las citas");
        assert_eq!(value["stats"]["totalWeeks"], 1);
        assert_eq!(value["stats"]["oldestWeek"], "2024-W11");
    }
}
