use thiserror::Error;

/// Errors that can occur when parsing a week key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeekKeyError {
    #[error("Invalid week key format: {0} (expected YYYY-Www)")]
    InvalidFormat(String),
    #[error("Week {week} does not exist in ISO year {year}")]
    OutOfRange { year: i32, week: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_display() {
        let error = WeekKeyError::InvalidFormat("2024-11".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid week key format: 2024-11 (expected YYYY-Www)"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let error = WeekKeyError::OutOfRange {
            year: 2024,
            week: 53,
        };
        assert_eq!(error.to_string(), "Week 53 does not exist in ISO year 2024");
    }
}
