use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::WeekKey;

/// Inclusive datetime window requested from the backend for one week.
///
/// Starts Monday 00:00:00.000 and ends at 23:59:59.999 seven days later, so
/// the following Monday is included. Results are still cached under the
/// week that starts the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Last representable millisecond of a day.
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1)
}

impl WeekRange {
    /// Creates the range for the week starting on `monday`.
    ///
    /// `monday` is not re-aligned; callers pass a week start.
    pub fn starting(monday: NaiveDate) -> Self {
        let start = monday.and_time(NaiveTime::MIN);
        let end = end_of_day(monday + Duration::days(7));
        Self { start, end }
    }

    /// Creates the range for the given week key.
    pub fn for_key(key: &WeekKey) -> Self {
        Self::starting(key.start_date())
    }
}
