//! Ticker symbol validation.
//!
//! Syntax: 1-5 ASCII letters after trimming and uppercasing. On top of that a
//! static table catches common misspellings of popular symbols so the user
//! gets a suggestion instead of an empty chart.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::constants::MAX_TICKER_LEN;
use crate::errors::ValidationError;

use super::ValidationResult;

/// Misspelling -> intended symbol. Entries must never be live tickers
/// themselves, otherwise the guard would block a real symbol.
static MISSPELLINGS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("APPL", "AAPL"),
        ("AAPPL", "AAPL"),
        ("MSFTT", "MSFT"),
        ("MSTF", "MSFT"),
        ("GOOOG", "GOOG"),
        ("GOOGG", "GOOGL"),
        ("AMZNN", "AMZN"),
        ("AMAZN", "AMZN"),
        ("TSLAA", "TSLA"),
        ("TESLA", "TSLA"),
        ("NVDIA", "NVDA"),
        ("NVIDA", "NVDA"),
        ("NFLXX", "NFLX"),
    ])
});

/// Trim, uppercase and check the syntax of a ticker symbol.
pub fn normalize_ticker(ticker: &str) -> Result<String, ValidationError> {
    let symbol = ticker.trim().to_ascii_uppercase();

    if symbol.is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    if symbol.chars().count() > MAX_TICKER_LEN {
        return Err(ValidationError::TickerTooLong(symbol));
    }
    if !symbol.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidTickerCharacters(symbol));
    }

    Ok(symbol)
}

/// Known correction for a normalized symbol, if any.
pub fn suggest_correction(symbol: &str) -> Option<&'static str> {
    MISSPELLINGS.get(symbol).copied()
}

/// Syntax check plus the misspelling guard. Returns the normalized symbol.
pub fn check_ticker(ticker: &str) -> Result<String, ValidationError> {
    let symbol = normalize_ticker(ticker)?;

    if let Some(suggestion) = suggest_correction(&symbol) {
        return Err(ValidationError::Misspelled {
            input: symbol,
            suggestion: suggestion.to_string(),
        });
    }

    Ok(symbol)
}

pub fn validate_ticker(ticker: &str) -> ValidationResult {
    check_ticker(ticker).into()
}
