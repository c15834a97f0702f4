use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::WeekKeyError;

/// Returns the Monday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - Duration::days(days_from_monday as i64)
}

/// Returns the ISO 8601 week number of `date`.
///
/// The ISO rule anchors each week on its Thursday: week 1 is the week that
/// contains the year's first Thursday.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Identifier of a Monday-starting ISO week, rendered as `YYYY-Www`.
///
/// The year is the ISO week-numbering year, so the Monday of 2024-12-30
/// belongs to `2025-W01`. Keys order chronologically, which matches the
/// lexicographic order of their string form for years 0000 through 9999.
/// Years are zero-padded to four digits; later years print in full and
/// parse back the same way.
///
/// # Examples
///
/// ```
/// use agenda_core::week::WeekKey;
/// use chrono::NaiveDate;
///
/// let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let key = WeekKey::from_date(friday);
/// assert_eq!(key.to_string(), "2024-W11");
/// assert_eq!(key.start_date(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    monday: NaiveDate,
}

impl WeekKey {
    /// Returns the key of the week containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            monday: week_start(date),
        }
    }

    /// Builds a key from an ISO year and week number.
    pub fn from_iso(year: i32, week: u32) -> Result<Self, WeekKeyError> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(|monday| Self { monday })
            .ok_or(WeekKeyError::OutOfRange { year, week })
    }

    /// Monday of this week.
    pub fn start_date(&self) -> NaiveDate {
        self.monday
    }

    /// ISO week-numbering year.
    pub fn iso_year(&self) -> i32 {
        self.monday.iso_week().year()
    }

    /// ISO week number (1..=53).
    pub fn week_number(&self) -> u32 {
        iso_week_number(self.monday)
    }

    /// Returns the key `offset` weeks away (negative goes back in time).
    pub fn shift(&self, offset: i64) -> Self {
        Self {
            monday: self.monday + Duration::weeks(offset),
        }
    }

    /// Returns true if `date` falls inside this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        week_start(date) == self.monday
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.iso_year(), self.week_number())
    }
}

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeekKeyError::InvalidFormat(s.to_string());

        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        let digits = year.strip_prefix('-').unwrap_or(year);
        if year.len() < 4
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || week.len() != 2
            || !week.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;

        Self::from_iso(year, week)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = WeekKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}
