//! Date range validation for dashboard queries.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{DAY_FIRST_DATE_FORMAT, DEFAULT_LOOKBACK_DAYS, ISO_DATE_FORMAT};
use crate::errors::ValidationError;
use crate::utils::time_utils::{business_days_between, market_today, most_recent_weekday};

use super::ValidationResult;

/// A date as it arrives from the query form: either already parsed or as
/// user-typed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Weekdays in the range, ascending.
    pub fn business_days(&self) -> Vec<NaiveDate> {
        business_days_between(self.start, self.end)
    }
}

/// Parse a single date, accepting `YYYY-MM-DD` and `DD/MM/YYYY`.
pub fn parse_date_input(input: impl Into<DateInput>) -> Result<NaiveDate, ValidationError> {
    match input.into() {
        DateInput::Date(date) => Ok(date),
        DateInput::Text(text) => {
            let text = text.trim();
            NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)
                .or_else(|_| NaiveDate::parse_from_str(text, DAY_FIRST_DATE_FORMAT))
                .map_err(|_| ValidationError::InvalidDateFormat(text.to_string()))
        }
    }
}

/// Parse and check a query range against the market's current date.
pub fn parse_date_range(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
) -> Result<DateRange, ValidationError> {
    parse_date_range_at(start, end, market_today())
}

/// Parse and check a query range: neither bound may be after `today` and
/// `start` must be strictly before `end`.
pub fn parse_date_range_at(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    today: NaiveDate,
) -> Result<DateRange, ValidationError> {
    let start = parse_date_input(start)?;
    let end = parse_date_input(end)?;

    for date in [start, end] {
        if date > today {
            return Err(ValidationError::FutureDate(date.to_string()));
        }
    }

    if start >= end {
        return Err(ValidationError::StartNotBeforeEnd {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(DateRange { start, end })
}

/// Parse a range for reading the cache. Single-day ranges and future dates
/// are allowed since nothing is fetched.
pub fn parse_lookup_range(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
) -> Result<DateRange, ValidationError> {
    let start = parse_date_input(start)?;
    let end = parse_date_input(end)?;

    if start > end {
        return Err(ValidationError::StartAfterEnd {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(DateRange { start, end })
}

pub fn validate_dates(start: impl Into<DateInput>, end: impl Into<DateInput>) -> ValidationResult {
    parse_date_range(start, end).into()
}

pub fn validate_dates_at(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    today: NaiveDate,
) -> ValidationResult {
    parse_date_range_at(start, end, today).into()
}

/// Range the query form starts with: ending on the most recent weekday and
/// looking back [`DEFAULT_LOOKBACK_DAYS`].
pub fn default_query_range(today: NaiveDate) -> DateRange {
    let end = most_recent_weekday(today);
    DateRange {
        start: end - Duration::days(DEFAULT_LOOKBACK_DAYS),
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 14)
    }

    #[test]
    fn test_accepts_both_text_formats() {
        assert_eq!(parse_date_input("2024-01-05").unwrap(), date(2024, 1, 5));
        assert_eq!(parse_date_input("05/01/2024").unwrap(), date(2024, 1, 5));
        assert_eq!(parse_date_input(" 2024-01-05 ").unwrap(), date(2024, 1, 5));
        assert_eq!(parse_date_input(date(2024, 1, 5)).unwrap(), date(2024, 1, 5));
    }

    #[test]
    fn test_unparsable_date_names_formats() {
        let result = validate_dates_at("2024/01/05", "2024-01-10", today());

        assert!(!result.is_valid);
        assert!(result.message.contains("YYYY-MM-DD"));
        assert!(result.message.contains("DD/MM/YYYY"));

        assert!(matches!(
            parse_date_input("2024-02-30"),
            Err(ValidationError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_valid_range() {
        let result = validate_dates_at("2024-01-01", "2024-01-10", today());
        assert!(result.is_valid);
        assert!(result.message.is_empty());

        let range = parse_date_range_at("2024-01-01", "10/01/2024", today()).unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 10));
    }

    #[test]
    fn test_rejects_future_dates() {
        let result = validate_dates_at("2024-06-01", "2024-06-15", today());
        assert!(!result.is_valid);
        assert!(result.message.contains("future"));

        // today itself is fine
        assert!(validate_dates_at("2024-06-01", "2024-06-14", today()).is_valid);
    }

    #[test]
    fn test_rejects_start_not_before_end() {
        let same = parse_date_range_at("2024-01-05", "2024-01-05", today());
        assert!(matches!(same, Err(ValidationError::StartNotBeforeEnd { .. })));

        let reversed = validate_dates_at("2024-01-10", "2024-01-01", today());
        assert!(!reversed.is_valid);
        assert!(reversed.message.contains("must precede"));
    }

    #[test]
    fn test_lookup_range_allows_single_day() {
        let range = parse_lookup_range("2024-01-05", "2024-01-05").unwrap();
        assert!(range.contains(date(2024, 1, 5)));

        assert!(matches!(
            parse_lookup_range("2024-01-06", "2024-01-05"),
            Err(ValidationError::StartAfterEnd { .. })
        ));
    }

    #[test]
    fn test_business_days_of_range() {
        let range = DateRange {
            start: date(2024, 1, 5),
            end: date(2024, 1, 8),
        };
        assert_eq!(range.business_days(), vec![date(2024, 1, 5), date(2024, 1, 8)]);
    }

    #[test]
    fn test_default_query_range() {
        // Monday falls back to the previous Friday
        let range = default_query_range(date(2024, 6, 17));
        assert_eq!(range.end, date(2024, 6, 14));
        assert_eq!(range.start, date(2024, 3, 16));

        let range = default_query_range(date(2024, 6, 12));
        assert_eq!(range.end, date(2024, 6, 12));
    }
}
