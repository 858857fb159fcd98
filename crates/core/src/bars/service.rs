//! Ticker retrieval service.
//!
//! This module provides the caller-facing operations of the ticker cache:
//! - Gap-filling retrieval (cache first, remote only for what is missing)
//! - Cache-only history reads
//! - Maintenance (listing and deleting cached tickers)
//! - Best-effort company name lookup
//!
//! # Retrieval
//!
//! ```text
//! validate ──► query cache ──► missing weekdays ──► unsettled? ──no──► cached series
//!                                                      │
//!                                                     yes
//!                                                      ▼
//!                            one remote call for the missing span
//!                                                      ▼
//!                            save_fetch (bars + range, one transaction)
//!                                                      ▼
//!                            re-query, merge (fetched wins), label source
//! ```

use std::sync::Arc;

use log::{debug, info, warn};

use stockdash_market_data::{MarketDataError as ProviderError, MarketDataProvider};

use super::coverage::{data_origin, merge_series, missing_dates, plan_fetch};
use super::import::normalize_raw_bars;
use super::model::{
    Bar, DataOrigin, DeleteSummary, SeriesSummary, StoredTicker, TickerData,
};
use super::store::BarStore;
use super::summary::summarize;
use crate::errors::Result;
use crate::utils::time_utils::utc_midnight_millis;
use crate::validation::{
    check_ticker, normalize_ticker, parse_date_range, parse_lookup_range, validate_ticker,
    DateInput, DateRange, ValidationResult,
};

/// Receives progress messages while a retrieval runs.
pub type StatusCallback = dyn Fn(&str) + Send + Sync;

fn report(on_status: Option<&StatusCallback>, message: &str) {
    if let Some(callback) = on_status {
        callback(message);
    }
}

/// Cache-first retrieval of daily bars.
///
/// The store and provider are injected so tests can count remote calls.
pub struct TickerService {
    store: Arc<dyn BarStore>,
    provider: Arc<dyn MarketDataProvider>,
}

impl TickerService {
    pub fn new(store: Arc<dyn BarStore>, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { store, provider }
    }

    pub fn validate_ticker(&self, ticker: &str) -> ValidationResult {
        validate_ticker(ticker)
    }

    /// Bars for `ticker` between `start` and `end`, fetching only the days the
    /// cache cannot answer.
    ///
    /// Returns `Ok(None)` when neither the cache nor the provider has a bar in
    /// the range. Provider failures are returned as-is and leave the cache
    /// untouched.
    pub async fn get_ticker_data(
        &self,
        ticker: &str,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
        on_status: Option<&StatusCallback>,
    ) -> Result<Option<TickerData>> {
        let symbol = check_ticker(ticker)?;
        let range = parse_date_range(start, end)?;

        report(on_status, &format!("Searching local cache for {}...", symbol));
        let cached = self.store.query_bars(&symbol, range.start, range.end)?;
        let missing = missing_dates(range.start, range.end, &cached);

        if missing.is_empty() {
            debug!(
                "Cache hit for {} {}..{}: {} bars",
                symbol,
                range.start,
                range.end,
                cached.len()
            );
            report(on_status, "All data found in local cache");
            return Ok(build_result(symbol, &range, cached, DataOrigin::Db));
        }

        let ranges = self.store.fetched_ranges(&symbol)?;
        let Some(plan) = plan_fetch(&missing, &ranges) else {
            debug!(
                "{} missing days for {} are settled by earlier fetches",
                missing.len(),
                symbol
            );
            report(on_status, "Local cache is up to date");
            return Ok(build_result(symbol, &range, cached, DataOrigin::Db));
        };

        report(
            on_status,
            &format!(
                "Fetching {} from {} to {} from remote source...",
                symbol, plan.start, plan.end
            ),
        );
        info!(
            "Fetching {} {}..{} from {} ({} cached bars, {} missing days)",
            symbol,
            plan.start,
            plan.end,
            self.provider.id(),
            cached.len(),
            missing.len()
        );

        let raw = match self.provider.fetch_bars(&symbol, plan.start, plan.end).await {
            Ok(raw) => raw,
            Err(ProviderError::NoDataForRange { .. }) => {
                debug!("{} has no data for {}..{}", symbol, plan.start, plan.end);
                Vec::new()
            }
            Err(e) => {
                warn!("Remote fetch failed for {}: {}", symbol, e);
                return Err(e.into());
            }
        };

        let fetched = if raw.is_empty() {
            Vec::new()
        } else {
            normalize_raw_bars(&symbol, &raw)?
        };

        report(
            on_status,
            &format!("Saving {} bars to local cache...", fetched.len()),
        );
        let inserted = self
            .store
            .save_fetch(
                &symbol,
                &raw,
                utc_midnight_millis(plan.start),
                utc_midnight_millis(plan.end),
            )
            .await?;
        info!(
            "Stored {} new bars for {} ({} received)",
            inserted,
            symbol,
            fetched.len()
        );

        let stored = self.store.query_bars(&symbol, range.start, range.end)?;
        let fresh: Vec<Bar> = fetched
            .into_iter()
            .filter(|bar| range.contains(bar.date))
            .collect();
        let source = data_origin(!cached.is_empty(), !fresh.is_empty());

        report(on_status, "Data ready");
        Ok(build_result(
            symbol,
            &range,
            merge_series(stored, fresh),
            source,
        ))
    }

    /// Cached bars only; never contacts the remote source.
    ///
    /// Only the ticker syntax is checked so symbols that are in the
    /// misspelling table can still be read back if they were stored.
    pub fn get_historical_data(
        &self,
        ticker: &str,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> Result<Option<TickerData>> {
        let symbol = normalize_ticker(ticker)?;
        let range = parse_lookup_range(start, end)?;

        let bars = self.store.query_bars(&symbol, range.start, range.end)?;
        debug!(
            "History read for {} {}..{}: {} bars",
            symbol,
            range.start,
            range.end,
            bars.len()
        );

        Ok(build_result(symbol, &range, bars, DataOrigin::Db))
    }

    pub fn list_stored_tickers(&self) -> Result<Vec<StoredTicker>> {
        self.store.list_tickers_with_ranges()
    }

    pub async fn delete_ticker(&self, ticker: &str) -> Result<DeleteSummary> {
        let symbol = normalize_ticker(ticker)?;
        let summary = self.store.delete_ticker(&symbol).await?;
        info!(
            "Deleted {} bars and {} ranges for {}",
            summary.bars, summary.ranges, symbol
        );
        Ok(summary)
    }

    /// Company name for display next to the chart. Any failure degrades to
    /// `None`.
    pub async fn get_company_name(&self, ticker: &str) -> Option<String> {
        let symbol = match normalize_ticker(ticker) {
            Ok(symbol) => symbol,
            Err(e) => {
                warn!("Skipping name lookup for '{}': {}", ticker, e);
                return None;
            }
        };

        match self.provider.fetch_ticker_name(&symbol).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to fetch company name for {}: {}", symbol, e);
                None
            }
        }
    }

    pub fn summarize(series: &[Bar]) -> Option<SeriesSummary> {
        summarize(series)
    }
}

fn build_result(
    ticker: String,
    range: &DateRange,
    series: Vec<Bar>,
    source: DataOrigin,
) -> Option<TickerData> {
    if series.is_empty() {
        return None;
    }
    let missing_dates = missing_dates(range.start, range.end, &series);
    Some(TickerData {
        ticker,
        series,
        source,
        missing_dates,
    })
}
