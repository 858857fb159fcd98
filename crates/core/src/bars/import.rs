//! Normalization of provider aggregates into bars.
//!
//! Every store implementation runs incoming aggregates through
//! [`normalize_raw_bars`] before writing, so a batch is either accepted as a
//! whole or rejected before anything touches storage.
//!
//! # Rules
//!
//! - the batch must not be empty
//! - `t`, `o`, `h`, `l`, `c` and `v` are required; `vw` is optional
//! - `t` must be an integral epoch-millisecond value (a float such as
//!   `1704171600000.0` is accepted, `1704171600000.5` is not)
//! - prices must be finite, volume finite and non-negative
//! - the bar date is the market date of `t`

use serde_json::Number;

use stockdash_market_data::RawBar;

use super::model::Bar;
use crate::errors::{Error, Result};
use crate::utils::time_utils::market_date_from_millis;

/// Uppercased, trimmed ticker used as the storage key.
pub fn ticker_key(ticker: &str) -> Result<String> {
    let key = ticker.trim().to_uppercase();
    if key.is_empty() {
        return Err(Error::InvalidData("Ticker is required".to_string()));
    }
    Ok(key)
}

/// Validate a batch of aggregates and convert it into bars for `ticker`.
pub fn normalize_raw_bars(ticker: &str, raw_bars: &[RawBar]) -> Result<Vec<Bar>> {
    let ticker = ticker_key(ticker)?;

    if raw_bars.is_empty() {
        return Err(Error::InvalidData(format!("No bars to store for {}", ticker)));
    }

    raw_bars
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_raw_bar(&ticker, index, raw))
        .collect()
}

fn normalize_raw_bar(ticker: &str, index: usize, raw: &RawBar) -> Result<Bar> {
    let missing = |field: &str| {
        Error::InvalidData(format!(
            "Bar {} for {} is missing required field '{}'",
            index, ticker, field
        ))
    };

    let t = raw.t.as_ref().ok_or_else(|| missing("t"))?;
    let open = raw.o.ok_or_else(|| missing("o"))?;
    let high = raw.h.ok_or_else(|| missing("h"))?;
    let low = raw.l.ok_or_else(|| missing("l"))?;
    let close = raw.c.ok_or_else(|| missing("c"))?;
    let volume = raw.v.ok_or_else(|| missing("v"))?;

    let timestamp = coerce_timestamp(t)
        .ok_or_else(|| Error::DataValidation(format!("Invalid timestamp {} in bar {}", t, index)))?;
    let date = market_date_from_millis(timestamp).ok_or_else(|| {
        Error::DataValidation(format!("Timestamp {} in bar {} is out of range", t, index))
    })?;

    for (field, value) in [("o", open), ("h", high), ("l", low), ("c", close)] {
        if !value.is_finite() {
            return Err(Error::InvalidData(format!(
                "Bar {} for {} has a non-finite '{}'",
                index, ticker, field
            )));
        }
    }

    if !volume.is_finite() || volume < 0.0 {
        return Err(Error::InvalidData(format!(
            "Bar {} for {} has invalid volume {}",
            index, ticker, volume
        )));
    }

    Ok(Bar {
        ticker: ticker.to_string(),
        date,
        open,
        high,
        low,
        close,
        volume: volume.round() as i64,
        vwap: raw.vw.filter(|v| v.is_finite()),
    })
}

/// Integral epoch milliseconds from a JSON number.
fn coerce_timestamp(t: &Number) -> Option<i64> {
    if let Some(value) = t.as_i64() {
        return Some(value);
    }
    let value = t.as_f64()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}
