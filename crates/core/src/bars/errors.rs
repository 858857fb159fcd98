//! Market data error types as seen by the domain.

use thiserror::Error;

use stockdash_market_data::MarketDataError as ExternalMarketDataError;

/// Errors that can occur while fetching bars from the remote source.
///
/// This error type bridges between the market-data crate's detailed error types
/// and the core domain's error handling needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No data found")]
    NoData,
}

impl MarketDataError {
    /// Returns true if this error is transient and a later retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MarketDataError::RateLimited(_) | MarketDataError::ConnectionFailed(_)
        )
    }
}

impl From<ExternalMarketDataError> for MarketDataError {
    fn from(error: ExternalMarketDataError) -> Self {
        match error {
            ExternalMarketDataError::RateLimited { provider } => {
                MarketDataError::RateLimited(provider)
            }
            ExternalMarketDataError::ConnectionFailed { provider, message } => {
                MarketDataError::ConnectionFailed(format!("{}: {}", provider, message))
            }
            ExternalMarketDataError::ProviderError { provider, message } => {
                MarketDataError::ProviderError(format!("{}: {}", provider, message))
            }
            ExternalMarketDataError::InvalidData { message } => {
                MarketDataError::InvalidData(message)
            }
            ExternalMarketDataError::NoDataForRange { .. } => MarketDataError::NoData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_kind() {
        let err: MarketDataError = ExternalMarketDataError::ConnectionFailed {
            provider: "POLYGON".to_string(),
            message: "Request timed out after 30s".to_string(),
        }
        .into();
        assert_eq!(
            err,
            MarketDataError::ConnectionFailed("POLYGON: Request timed out after 30s".to_string())
        );
        assert!(err.is_transient());

        let err: MarketDataError = ExternalMarketDataError::NoDataForRange {
            ticker: "AAPL".to_string(),
            start: "2024-01-06".to_string(),
            end: "2024-01-07".to_string(),
        }
        .into();
        assert_eq!(err, MarketDataError::NoData);
        assert!(!err.is_transient());
    }
}
