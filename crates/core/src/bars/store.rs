//! Bar storage traits.
//!
//! This module defines the storage interface for cached bars and the log of
//! remote fetches. The trait abstracts the persistence layer so the retrieval
//! service can run against SQLite in production and an in-memory mock in tests.

use async_trait::async_trait;
use chrono::NaiveDate;

use stockdash_market_data::RawBar;

use super::model::{Bar, DeleteSummary, FetchedRange, StoredTicker};
use crate::constants::ISO_DATE_FORMAT;
use crate::errors::{Error, Result};

// =============================================================================
// Bar Store
// =============================================================================

/// Storage interface for bars and fetched ranges.
///
/// # Design Notes
///
/// - Async methods are used for mutations, which go through a single writer
/// - Sync methods are used for reads, which use pooled connections
/// - Bar writes are insert-if-absent on (ticker, date): a stored bar is
///   never overwritten
/// - Every mutating call is one transaction
#[async_trait]
pub trait BarStore: Send + Sync {
    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts the aggregates that do not have a stored bar yet.
    ///
    /// The whole batch is validated first (see [`super::import`]); an empty
    /// batch or a malformed aggregate rejects the call without writing.
    ///
    /// # Returns
    ///
    /// The number of newly inserted bars.
    async fn upsert_bars(&self, ticker: &str, bars: &[RawBar]) -> Result<usize>;

    /// Records that `[start_ts, end_ts]` was fetched for `ticker`.
    ///
    /// Bounds are swapped when given in reverse order. Recording the exact
    /// same span twice keeps a single row.
    ///
    /// # Returns
    ///
    /// `true` when a new row was written.
    async fn record_fetched_range(&self, ticker: &str, start_ts: i64, end_ts: i64)
        -> Result<bool>;

    /// Stores the result of one remote fetch: the bars and the range record,
    /// in one transaction.
    ///
    /// An empty `bars` slice records only the range (the provider
    /// legitimately had nothing for the span).
    async fn save_fetch(
        &self,
        ticker: &str,
        bars: &[RawBar],
        start_ts: i64,
        end_ts: i64,
    ) -> Result<usize>;

    /// Removes every bar and fetched range of `ticker` atomically.
    async fn delete_ticker(&self, ticker: &str) -> Result<DeleteSummary>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Bars of `ticker` with `start <= date <= end`, ascending by date.
    fn query_bars(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>>;

    /// Same as [`BarStore::query_bars`] with `YYYY-MM-DD` bounds.
    fn query_bars_between(&self, ticker: &str, start: &str, end: &str) -> Result<Vec<Bar>> {
        let start = parse_storage_date(start)?;
        let end = parse_storage_date(end)?;
        self.query_bars(ticker, start, end)
    }

    /// Fetch history of `ticker`, newest first.
    fn fetched_ranges(&self, ticker: &str) -> Result<Vec<FetchedRange>>;

    /// Every ticker with at least one fetched range, alphabetically, each with
    /// its ranges newest first.
    fn list_tickers_with_ranges(&self) -> Result<Vec<StoredTicker>>;
}

/// Parses a `YYYY-MM-DD` storage date.
pub fn parse_storage_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|_| {
        Error::DataValidation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_date() {
        assert_eq!(
            parse_storage_date("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(matches!(
            parse_storage_date("10/01/2024"),
            Err(Error::DataValidation(_))
        ));
        assert!(matches!(
            parse_storage_date("2024-13-01"),
            Err(Error::DataValidation(_))
        ));
    }
}
