//! Bar cache domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::time_utils::{market_date_from_millis, utc_date_from_millis};

// =============================================================================
// Bar
// =============================================================================

/// One trading day of a ticker.
///
/// At most one bar exists per (ticker, date). Bars are created on ingestion
/// only and never synthesized for days the provider did not report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub vwap: Option<f64>,
}

// =============================================================================
// Fetched Ranges
// =============================================================================

/// Record of one remote fetch: which span was requested and when.
///
/// Bounds are epoch milliseconds with `start_ts <= end_ts`. Ranges are fetch
/// history and are never merged with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedRange {
    pub ticker: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub created_at: i64,
}

impl FetchedRange {
    /// First day of the span (UTC calendar date of `start_ts`).
    pub fn start_date(&self) -> Option<NaiveDate> {
        utc_date_from_millis(self.start_ts)
    }

    /// Last day of the span (UTC calendar date of `end_ts`).
    pub fn end_date(&self) -> Option<NaiveDate> {
        utc_date_from_millis(self.end_ts)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    /// A day is settled when this fetch covered it and happened after the
    /// day was over on the market: a missing bar then means the provider has
    /// none (holiday, halt) and asking again would return the same.
    pub fn settles(&self, date: NaiveDate) -> bool {
        self.covers(date)
            && market_date_from_millis(self.created_at).is_some_and(|created| created > date)
    }
}

/// A fetched range as listed on the maintenance page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_ts: i64,
    pub end_ts: i64,
    pub created_at: i64,
    /// Stored bars of the ticker dated inside this range
    pub data_points: i64,
}

/// A cached ticker with its fetch history, newest range first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTicker {
    pub ticker: String,
    pub ranges: Vec<StoredRange>,
}

/// Rows removed by `delete_ticker`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub bars: usize,
    pub ranges: usize,
}

// =============================================================================
// Retrieval Result
// =============================================================================

/// Where the bars of a [`TickerData`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Served entirely from the local cache
    Db,
    /// Served entirely from a fresh remote fetch
    Api,
    /// Cached bars completed by a remote fetch
    Mixed,
}

impl DataOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataOrigin::Db => "db",
            DataOrigin::Api => "api",
            DataOrigin::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined series for a ticker and date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerData {
    pub ticker: String,
    /// Ascending by date, one bar per date
    pub series: Vec<Bar>,
    pub source: DataOrigin,
    /// Weekdays in the requested range without a bar
    pub missing_dates: Vec<NaiveDate>,
}

impl TickerData {
    pub fn summary(&self) -> Option<SeriesSummary> {
        super::summary::summarize(&self.series)
    }
}

/// Headline numbers shown above the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub avg_close: f64,
    pub min_low: f64,
    pub max_high: f64,
    pub total_volume: i64,
    pub bar_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::{market_midnight_millis, utc_midnight_millis};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate, created: NaiveDate) -> FetchedRange {
        FetchedRange {
            ticker: "AAPL".to_string(),
            start_ts: utc_midnight_millis(start),
            end_ts: utc_midnight_millis(end),
            // mid-morning in New York
            created_at: market_midnight_millis(created) + 10 * 3_600_000,
        }
    }

    #[test]
    fn test_range_covers_inclusive_bounds() {
        let r = range(date(2024, 1, 1), date(2024, 1, 10), date(2024, 2, 1));

        assert!(r.covers(date(2024, 1, 1)));
        assert!(r.covers(date(2024, 1, 10)));
        assert!(!r.covers(date(2024, 1, 11)));
        assert!(!r.covers(date(2023, 12, 31)));
    }

    #[test]
    fn test_range_settles_only_days_before_creation() {
        let r = range(date(2024, 1, 1), date(2024, 1, 10), date(2024, 1, 10));

        assert!(r.settles(date(2024, 1, 9)));
        // fetched during the trading day itself: the bar may still appear
        assert!(!r.settles(date(2024, 1, 10)));
        assert!(!r.settles(date(2024, 1, 11)));
    }

    #[test]
    fn test_data_origin_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DataOrigin::Mixed).unwrap(), "\"mixed\"");
        assert_eq!(DataOrigin::Db.to_string(), "db");
    }
}
