//! Polygon.io market data provider implementation.
//!
//! Endpoints used:
//! - `/v2/aggs/ticker/{ticker}/range/1/day/{from}/{to}` for daily aggregates
//! - `/v3/reference/tickers/{ticker}` for the company name
//!
//! API documentation: https://polygon.io/docs/stocks

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{RawBar, TickerDetails};
use crate::provider::MarketDataProvider;

use models::{AggregatesResponse, ErrorResponse, TickerDetailsResponse};

const BASE_URL: &str = "https://api.polygon.io";
const PROVIDER_ID: &str = "POLYGON";
const API_KEY_ENV: &str = "POLYGON_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Polygon.io market data provider.
pub struct PolygonProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PolygonProvider {
    /// Create a new Polygon provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create a provider from the `POLYGON_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, MarketDataError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("{} is not set", API_KEY_ENV),
            }),
        }
    }

    /// Point the provider at another host (proxies, recorded fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET `path` and return the HTTP status with the raw body.
    ///
    /// Transport failures, including the client timeout, become
    /// `ConnectionFailed`. HTTP level classification is left to the caller
    /// because a 404 means different things for different endpoints.
    async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<(StatusCode, String), MarketDataError> {
        let url = format!("{}{}", self.base_url, path);

        debug!("Polygon request: {} with {} params", path, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("Request timed out after {}s", REQUEST_TIMEOUT.as_secs())
                } else {
                    format!("Request failed: {}", e.without_url())
                };
                MarketDataError::ConnectionFailed {
                    provider: PROVIDER_ID.to_string(),
                    message,
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::ConnectionFailed {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e.without_url()),
            })?;

        Ok((status, body))
    }
}

#[async_trait]
impl MarketDataProvider for PolygonProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, MarketDataError> {
        let path = format!(
            "/v2/aggs/ticker/{}/range/1/day/{}/{}",
            encode(ticker),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        let params = [("adjusted", "true"), ("sort", "asc"), ("limit", "50000")];

        let (status, body) = self.get(&path, &params).await?;
        parse_aggregates(ticker, start, end, status, &body)
    }

    async fn fetch_ticker_name(&self, ticker: &str) -> Result<Option<String>, MarketDataError> {
        let path = format!("/v3/reference/tickers/{}", encode(ticker));

        let (status, body) = self.get(&path, &[]).await?;
        let details = parse_ticker_details(ticker, status, &body)?;

        Ok(details.and_then(|d| d.display_name().map(str::to_string)))
    }
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Map a non-success HTTP status to an error kind.
fn check_status(status: StatusCode, body: &str) -> Result<(), MarketDataError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: PROVIDER_ID.to_string(),
        });
    }

    if status.is_success() {
        return Ok(());
    }

    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.description().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status));

    Err(MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message,
    })
}

/// Turn an aggregates response into raw bars.
fn parse_aggregates(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: StatusCode,
    body: &str,
) -> Result<Vec<RawBar>, MarketDataError> {
    check_status(status, body)?;

    let response: AggregatesResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::InvalidData {
            message: format!("Failed to parse aggregates response for {}: {}", ticker, e),
        })?;

    if response.status.as_deref() == Some("ERROR") {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: response
                .error
                .or(response.message)
                .unwrap_or_else(|| format!("ERROR status for {}", ticker)),
        });
    }

    let no_data = || MarketDataError::NoDataForRange {
        ticker: ticker.to_string(),
        start: start.format("%Y-%m-%d").to_string(),
        end: end.format("%Y-%m-%d").to_string(),
    };

    let results = match response.results {
        None | Some(serde_json::Value::Null) => return Err(no_data()),
        Some(serde_json::Value::Array(items)) => items,
        Some(_) => {
            return Err(MarketDataError::InvalidData {
                message: format!("Invalid aggregates format for {}: results is not a list", ticker),
            })
        }
    };

    if results.is_empty() {
        return Err(no_data());
    }

    if let Some(count) = response.results_count {
        if count as usize != results.len() {
            warn!(
                "Polygon reported {} results for {} but sent {}",
                count,
                ticker,
                results.len()
            );
        }
    }

    results
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RawBar>(item).map_err(|e| MarketDataError::InvalidData {
                message: format!("Invalid aggregate at index {} for {}: {}", index, ticker, e),
            })
        })
        .collect()
}

/// Turn a ticker details response into [`TickerDetails`].
///
/// 404 means the provider does not know the ticker, which is not an error
/// for a name lookup.
fn parse_ticker_details(
    ticker: &str,
    status: StatusCode,
    body: &str,
) -> Result<Option<TickerDetails>, MarketDataError> {
    if status == StatusCode::NOT_FOUND {
        debug!("Polygon has no reference data for {}", ticker);
        return Ok(None);
    }

    check_status(status, body)?;

    let response: TickerDetailsResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::InvalidData {
            message: format!("Failed to parse ticker details for {}: {}", ticker, e),
        })?;

    if response.status.as_deref() == Some("ERROR") {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: response
                .error
                .or(response.message)
                .unwrap_or_else(|| format!("ERROR status for {}", ticker)),
        });
    }

    Ok(response.results.map(|r| TickerDetails {
        ticker: r.ticker.unwrap_or_else(|| ticker.to_string()),
        name: r.name,
        market: r.market,
        primary_exchange: r.primary_exchange,
        currency_name: r.currency_name,
        active: r.active,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_parse_aggregates_ok() {
        let body = r#"{
            "ticker": "AAPL",
            "status": "OK",
            "resultsCount": 2,
            "results": [
                {"v": 82488674, "vw": 186.1, "o": 187.15, "c": 185.64, "h": 188.44, "l": 183.885, "t": 1704171600000},
                {"v": 58414460, "vw": 184.3, "o": 184.22, "c": 184.25, "h": 185.88, "l": 183.43, "t": 1704258000000}
            ]
        }"#;

        let bars = parse_aggregates("AAPL", jan(1), jan(10), StatusCode::OK, body).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].c, Some(185.64));
        assert_eq!(bars[1].t.as_ref().and_then(|t| t.as_i64()), Some(1704258000000));
    }

    #[test]
    fn test_parse_aggregates_rate_limited() {
        let body = r#"{"status":"ERROR","error":"You've exceeded the maximum requests per minute"}"#;

        let err = parse_aggregates("AAPL", jan(1), jan(10), StatusCode::TOO_MANY_REQUESTS, body)
            .unwrap_err();

        assert!(matches!(err, MarketDataError::RateLimited { .. }));
    }

    #[test]
    fn test_parse_aggregates_error_status() {
        let body = r#"{"status":"ERROR","request_id":"abc","error":"Unknown API Key"}"#;

        let err = parse_aggregates("AAPL", jan(1), jan(10), StatusCode::OK, body).unwrap_err();

        match err {
            MarketDataError::ProviderError { provider, message } => {
                assert_eq!(provider, "POLYGON");
                assert_eq!(message, "Unknown API Key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_aggregates_http_error_uses_body_message() {
        let body = r#"{"status":"NOT_AUTHORIZED","message":"Your plan doesn't include this data timeframe."}"#;

        let err =
            parse_aggregates("AAPL", jan(1), jan(10), StatusCode::FORBIDDEN, body).unwrap_err();

        match err {
            MarketDataError::ProviderError { message, .. } => {
                assert!(message.contains("plan"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_aggregates_without_results_is_no_data() {
        let body = r#"{"ticker":"AAPL","status":"OK","resultsCount":0,"queryCount":0}"#;

        let err = parse_aggregates("AAPL", jan(6), jan(7), StatusCode::OK, body).unwrap_err();

        match err {
            MarketDataError::NoDataForRange { ticker, start, end } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(start, "2024-01-06");
                assert_eq!(end, "2024-01-07");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_aggregates_empty_results_is_no_data() {
        let body = r#"{"status":"OK","results":[]}"#;

        let err = parse_aggregates("AAPL", jan(6), jan(7), StatusCode::OK, body).unwrap_err();

        assert!(matches!(err, MarketDataError::NoDataForRange { .. }));
    }

    #[test]
    fn test_parse_aggregates_results_not_a_list() {
        let body = r#"{"status":"OK","results":{"t":1704171600000}}"#;

        let err = parse_aggregates("AAPL", jan(1), jan(10), StatusCode::OK, body).unwrap_err();

        assert!(matches!(err, MarketDataError::InvalidData { .. }));
    }

    #[test]
    fn test_parse_aggregates_malformed_json() {
        let err =
            parse_aggregates("AAPL", jan(1), jan(10), StatusCode::OK, "<html>").unwrap_err();

        assert!(matches!(err, MarketDataError::InvalidData { .. }));
    }

    #[test]
    fn test_parse_aggregates_bad_item() {
        let body = r#"{"status":"OK","results":[{"t":"yesterday"}]}"#;

        let err = parse_aggregates("AAPL", jan(1), jan(10), StatusCode::OK, body).unwrap_err();

        assert!(matches!(err, MarketDataError::InvalidData { .. }));
    }

    #[test]
    fn test_parse_ticker_details() {
        let body = r#"{
            "request_id": "31d59dda",
            "results": {
                "ticker": "AAPL",
                "name": "Apple Inc.",
                "market": "stocks",
                "primary_exchange": "XNAS",
                "currency_name": "usd",
                "active": true
            },
            "status": "OK"
        }"#;

        let details = parse_ticker_details("AAPL", StatusCode::OK, body)
            .unwrap()
            .unwrap();

        assert_eq!(details.display_name(), Some("Apple Inc."));
        assert_eq!(details.primary_exchange.as_deref(), Some("XNAS"));
        assert_eq!(details.active, Some(true));
    }

    #[test]
    fn test_parse_ticker_details_not_found_is_none() {
        let body = r#"{"status":"NOT_FOUND","message":"Ticker not found."}"#;

        let details = parse_ticker_details("ZZZZ", StatusCode::NOT_FOUND, body).unwrap();

        assert!(details.is_none());
    }

    #[test]
    fn test_parse_ticker_details_without_results() {
        let details = parse_ticker_details("ZZZZ", StatusCode::OK, r#"{"status":"OK"}"#).unwrap();
        assert!(details.is_none());
    }

    #[test]
    fn test_parse_ticker_details_rate_limited() {
        let err = parse_ticker_details("AAPL", StatusCode::TOO_MANY_REQUESTS, "").unwrap_err();
        assert!(matches!(err, MarketDataError::RateLimited { .. }));
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let provider = PolygonProvider::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.id(), "POLYGON");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_failed() {
        // Port 9 (discard) on localhost is closed in test environments.
        let provider = PolygonProvider::new("key").with_base_url("http://127.0.0.1:9");

        let err = provider
            .fetch_bars("AAPL", jan(1), jan(10))
            .await
            .unwrap_err();

        assert!(matches!(err, MarketDataError::ConnectionFailed { .. }));
    }
}
