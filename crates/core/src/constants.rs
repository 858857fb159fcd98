/// Longest ticker symbol accepted by the validator
pub const MAX_TICKER_LEN: usize = 5;

/// Days between the default start and end of a dashboard query
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// Canonical date format used for storage and provider requests
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-first format accepted from the date picker
pub const DAY_FIRST_DATE_FORMAT: &str = "%d/%m/%Y";
