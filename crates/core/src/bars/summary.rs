use super::model::{Bar, SeriesSummary};

/// Summary statistics over a series, `None` when it is empty.
pub fn summarize(series: &[Bar]) -> Option<SeriesSummary> {
    let first = series.first()?;

    let mut start_date = first.date;
    let mut end_date = first.date;
    let mut close_sum = 0.0;
    let mut min_low = f64::INFINITY;
    let mut max_high = f64::NEG_INFINITY;
    let mut total_volume: i64 = 0;

    for bar in series {
        start_date = start_date.min(bar.date);
        end_date = end_date.max(bar.date);
        close_sum += bar.close;
        min_low = min_low.min(bar.low);
        max_high = max_high.max(bar.high);
        total_volume = total_volume.saturating_add(bar.volume);
    }

    Some(SeriesSummary {
        start_date,
        end_date,
        avg_close: close_sum / series.len() as f64,
        min_low,
        max_high,
        total_volume,
        bar_count: series.len(),
    })
}
