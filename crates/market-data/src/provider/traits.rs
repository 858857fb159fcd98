//! Market data provider trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::RawBar;

/// Trait for market data providers.
///
/// This is the only surface the ticker cache sees of the outside world.
/// Implementations must map every failure onto a [`MarketDataError`] kind
/// and must never turn a rate limit or a connection failure into an empty
/// result.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockdash_market_data::{MarketDataError, MarketDataProvider, RawBar};
///
/// struct CsvProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for CsvProvider {
///     fn id(&self) -> &'static str {
///         "CSV"
///     }
///
///     // ... implement fetch_bars / fetch_ticker_name
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "POLYGON".
    fn id(&self) -> &'static str;

    /// Fetch daily aggregates for `ticker` between `start` and `end`
    /// (both inclusive), ordered by timestamp ascending.
    ///
    /// Returns [`MarketDataError::NoDataForRange`] when the provider answered
    /// correctly but has no aggregate in the range.
    async fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, MarketDataError>;

    /// Fetch the display name of the company behind `ticker`.
    ///
    /// An unknown ticker or a response without a name is `Ok(None)`, not an
    /// error.
    async fn fetch_ticker_name(&self, ticker: &str) -> Result<Option<String>, MarketDataError>;
}
