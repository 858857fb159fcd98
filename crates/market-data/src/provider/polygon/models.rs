//! Polygon.io API response models.
//!
//! Only the fields the ticker cache needs are mapped; everything else in the
//! envelopes is ignored by serde.

use serde::Deserialize;
use serde_json::Value;

/// Envelope of `/v2/aggs/ticker/{ticker}/range/1/day/{from}/{to}`.
///
/// `results` stays an untyped value so a payload where it is not an array can
/// be reported as invalid data instead of a generic parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatesResponse {
    pub status: Option<String>,
    pub results_count: Option<u64>,
    pub results: Option<Value>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Envelope of `/v3/reference/tickers/{ticker}`.
#[derive(Debug, Deserialize)]
pub struct TickerDetailsResponse {
    pub status: Option<String>,
    pub results: Option<TickerDetailsResult>,
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TickerDetailsResult {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub market: Option<String>,
    pub primary_exchange: Option<String>,
    pub currency_name: Option<String>,
    pub active: Option<bool>,
}

/// Error body Polygon sends alongside non-success HTTP statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn description(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}
