//! Error types for the market data crate.
//!
//! Every failure a provider can produce falls in one of a handful of
//! distinguishable kinds. Callers must be able to tell a rate limit or a
//! dropped connection apart from "the provider has nothing for this range".

use thiserror::Error;

/// Errors that can occur while talking to a market data provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request never produced a response: DNS, TLS, refused
    /// connection or the client timeout elapsed.
    #[error("Connection failed: {provider} - {message}")]
    ConnectionFailed {
        /// The provider we tried to reach
        provider: String,
        /// Transport level description
        message: String,
    },

    /// The provider answered, but with an error (non-success HTTP status or
    /// an `ERROR` status in the envelope).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The payload could not be parsed or does not have the expected shape.
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Description of what was wrong with the payload
        message: String,
    },

    /// Well-formed response without any aggregates for the requested range.
    /// Weekends, holidays and pre-listing periods produce this.
    #[error("No data for {ticker} between {start} and {end}")]
    NoDataForRange {
        ticker: String,
        start: String,
        end: String,
    },
}

impl MarketDataError {
    /// Returns true if trying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::ConnectionFailed { .. }
        )
    }

    /// Provider identifier attached to the error, when there is one.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::RateLimited { provider }
            | Self::ConnectionFailed { provider, .. }
            | Self::ProviderError { provider, .. } => Some(provider),
            Self::InvalidData { .. } | Self::NoDataForRange { .. } => None,
        }
    }
}
