use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// Timezone of the US equity market.
/// Provider timestamps and "today" are both read in this zone so that a daily
/// aggregate stamped at midnight Eastern lands on its trading date.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a market date in the given timezone.
pub fn market_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Market date for an epoch-millisecond timestamp, or `None` when the value
/// is outside chrono's representable range.
pub fn market_date_from_millis(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|instant| market_date_from_utc(instant, DEFAULT_MARKET_TZ))
}

/// Today's calendar date on the US market.
pub fn market_today() -> NaiveDate {
    market_date_from_utc(Utc::now(), DEFAULT_MARKET_TZ)
}

/// Epoch milliseconds of midnight UTC at the start of `date`.
pub fn utc_midnight_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// UTC calendar date of an epoch-millisecond timestamp.
pub fn utc_date_from_millis(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
}

/// Epoch milliseconds of midnight on `date` in the market timezone, which is
/// how daily aggregates are stamped.
pub fn market_midnight_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| DEFAULT_MARKET_TZ.from_local_datetime(&naive).earliest())
        .map(|local| local.timestamp_millis())
        .unwrap_or_else(|| utc_midnight_millis(date))
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Monday to Friday. Exchange holidays are not modelled.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays in `[start, end]`, ascending.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    get_days_between(start, end)
        .into_iter()
        .filter(|day| is_business_day(*day))
        .collect()
}

/// The weekday the date picker defaults to as "end": the previous Friday for
/// weekends and Mondays, otherwise `today` itself.
pub fn most_recent_weekday(today: NaiveDate) -> NaiveDate {
    let back = match today.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        Weekday::Mon => 3,
        _ => 0,
    };
    today - Duration::days(back)
}
