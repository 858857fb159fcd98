//! Coverage analysis: which days are missing, which of them are worth a
//! remote call, and how cached and fetched bars combine.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use super::model::{Bar, DataOrigin, FetchedRange};
use crate::utils::time_utils::business_days_between;

/// Inclusive span to request from the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Weekdays in `[start, end]` without a bar, ascending.
///
/// Weekends are never reported. Exchange holidays are, until a fetch settles
/// them (see [`plan_fetch`]).
pub fn missing_dates(start: NaiveDate, end: NaiveDate, bars: &[Bar]) -> Vec<NaiveDate> {
    let present: HashSet<NaiveDate> = bars.iter().map(|bar| bar.date).collect();
    business_days_between(start, end)
        .into_iter()
        .filter(|day| !present.contains(day))
        .collect()
}

/// Plan a single remote call spanning every missing day that no earlier
/// fetch has settled, or `None` when the cache is as complete as it can get.
pub fn plan_fetch(missing: &[NaiveDate], ranges: &[FetchedRange]) -> Option<FetchPlan> {
    let mut unsettled = missing
        .iter()
        .copied()
        .filter(|day| !ranges.iter().any(|range| range.settles(*day)));

    let first = unsettled.next()?;
    let (start, end) = unsettled.fold((first, first), |(lo, hi), day| (lo.min(day), hi.max(day)));

    Some(FetchPlan { start, end })
}

/// Combine cached and fetched bars by date, fetched values winning, ascending.
pub fn merge_series(cached: Vec<Bar>, fetched: Vec<Bar>) -> Vec<Bar> {
    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    for bar in cached {
        by_date.insert(bar.date, bar);
    }
    for bar in fetched {
        by_date.insert(bar.date, bar);
    }
    by_date.into_values().collect()
}

/// Provenance label of a combined series.
pub fn data_origin(had_cached: bool, fetched_contributed: bool) -> DataOrigin {
    match (had_cached, fetched_contributed) {
        (_, false) => DataOrigin::Db,
        (false, true) => DataOrigin::Api,
        (true, true) => DataOrigin::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::{market_midnight_millis, utc_midnight_millis};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn bar(day: NaiveDate, close: f64) -> Bar {
        Bar {
            ticker: "AAPL".to_string(),
            date: day,
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
            vwap: None,
        }
    }

    fn fetched(start: NaiveDate, end: NaiveDate, created: NaiveDate) -> FetchedRange {
        FetchedRange {
            ticker: "AAPL".to_string(),
            start_ts: utc_midnight_millis(start),
            end_ts: utc_midnight_millis(end),
            created_at: market_midnight_millis(created) + 3_600_000,
        }
    }

    #[test]
    fn test_missing_dates_skip_weekends() {
        let bars = vec![bar(date(1, 2), 1.0), bar(date(1, 3), 1.0)];

        let missing = missing_dates(date(1, 1), date(1, 10), &bars);

        assert_eq!(
            missing,
            vec![date(1, 1), date(1, 4), date(1, 5), date(1, 8), date(1, 9), date(1, 10)]
        );
        assert!(!missing.contains(&date(1, 6)));
    }

    #[test]
    fn test_weekend_only_range_has_nothing_missing() {
        assert!(missing_dates(date(1, 6), date(1, 7), &[]).is_empty());
    }

    #[test]
    fn test_plan_spans_unsettled_days() {
        let plan = plan_fetch(&[date(1, 4), date(1, 5), date(1, 9)], &[]).unwrap();
        assert_eq!(plan, FetchPlan { start: date(1, 4), end: date(1, 9) });
    }

    #[test]
    fn test_settled_days_are_not_refetched() {
        // New Year's Day came back empty from a fetch made a week later
        let ranges = vec![fetched(date(1, 1), date(1, 10), date(1, 11))];

        assert_eq!(plan_fetch(&[date(1, 1)], &ranges), None);

        // a day outside the recorded span still needs a call
        let plan = plan_fetch(&[date(1, 1), date(1, 12)], &ranges).unwrap();
        assert_eq!(plan, FetchPlan { start: date(1, 12), end: date(1, 12) });
    }

    #[test]
    fn test_same_day_fetch_does_not_settle() {
        let ranges = vec![fetched(date(1, 8), date(1, 10), date(1, 10))];

        let plan = plan_fetch(&[date(1, 10)], &ranges).unwrap();
        assert_eq!(plan.start, date(1, 10));
    }

    #[test]
    fn test_merge_prefers_fetched_values() {
        let cached = vec![bar(date(1, 2), 100.0), bar(date(1, 3), 101.0)];
        let fresh = vec![bar(date(1, 3), 150.0), bar(date(1, 4), 102.0)];

        let merged = merge_series(cached, fresh);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].date, date(1, 3));
        assert_eq!(merged[1].close, 150.0);
        assert!(merged.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_data_origin() {
        assert_eq!(data_origin(true, false), DataOrigin::Db);
        assert_eq!(data_origin(false, false), DataOrigin::Db);
        assert_eq!(data_origin(false, true), DataOrigin::Api);
        assert_eq!(data_origin(true, true), DataOrigin::Mixed);
    }
}
