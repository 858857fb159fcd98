use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use std::sync::Arc;

use super::model::{format_date, BarDB, FetchedRangeDB, NewBarDB, NewFetchedRangeDB};
use crate::db::{create_pool, get_connection, init, run_migrations, spawn_writer, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::ticker_data::dsl as bars_dsl;
use crate::schema::ticker_ranges::dsl as ranges_dsl;
use stockdash_core::bars::import::{normalize_raw_bars, ticker_key};
use stockdash_core::bars::{
    Bar, BarStore, DeleteSummary, FetchedRange, StoredRange, StoredTicker,
};
use stockdash_core::utils::time_utils::utc_date_from_millis;
use stockdash_core::Result;
use stockdash_market_data::RawBar;

pub struct BarRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BarRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Open (creating if needed) the ticker cache under `app_data_dir`.
    ///
    /// Must be called from within a Tokio runtime: it spawns the writer.
    pub fn open(app_data_dir: &str) -> Result<Self> {
        let db_path = init(app_data_dir)?;
        let pool = create_pool(&db_path)?;
        run_migrations(&pool)?;
        let writer = spawn_writer((*pool).clone());
        Ok(Self::new(pool, writer))
    }
}

/// Insert rows that have no stored bar for their (ticker, date) yet.
fn insert_bars(conn: &mut SqliteConnection, rows: &[NewBarDB]) -> Result<usize> {
    let mut inserted = 0;
    for row in rows {
        inserted += diesel::insert_or_ignore_into(bars_dsl::ticker_data)
            .values(row)
            .execute(conn)
            .into_core()?;
    }
    Ok(inserted)
}

fn insert_range(conn: &mut SqliteConnection, row: &NewFetchedRangeDB) -> Result<bool> {
    let inserted = diesel::insert_or_ignore_into(ranges_dsl::ticker_ranges)
        .values(row)
        .execute(conn)
        .into_core()?;
    Ok(inserted > 0)
}

fn new_range(ticker: String, start_ts: i64, end_ts: i64) -> NewFetchedRangeDB {
    NewFetchedRangeDB {
        ticker,
        start_date: start_ts.min(end_ts),
        end_date: start_ts.max(end_ts),
        created_at: Utc::now().timestamp_millis(),
    }
}

// =============================================================================
// BarStore Implementation
// =============================================================================

#[async_trait]
impl BarStore for BarRepository {
    // =========================================================================
    // Mutations
    // =========================================================================

    async fn upsert_bars(&self, ticker: &str, bars: &[RawBar]) -> Result<usize> {
        let rows: Vec<NewBarDB> = normalize_raw_bars(ticker, bars)?
            .iter()
            .map(NewBarDB::from)
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                insert_bars(conn, &rows)
            })
            .await
    }

    async fn record_fetched_range(
        &self,
        ticker: &str,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<bool> {
        let row = new_range(ticker_key(ticker)?, start_ts, end_ts);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> { insert_range(conn, &row) })
            .await
    }

    async fn save_fetch(
        &self,
        ticker: &str,
        bars: &[RawBar],
        start_ts: i64,
        end_ts: i64,
    ) -> Result<usize> {
        let key = ticker_key(ticker)?;
        let rows: Vec<NewBarDB> = if bars.is_empty() {
            Vec::new()
        } else {
            normalize_raw_bars(&key, bars)?
                .iter()
                .map(NewBarDB::from)
                .collect()
        };
        let range = new_range(key, start_ts, end_ts);

        let received = rows.len();
        let inserted = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let inserted = insert_bars(conn, &rows)?;
                insert_range(conn, &range)?;
                Ok(inserted)
            })
            .await?;

        debug!(
            "Saved fetch for {}: {} of {} bars were new",
            ticker, inserted, received
        );
        Ok(inserted)
    }

    async fn delete_ticker(&self, ticker: &str) -> Result<DeleteSummary> {
        let key = ticker_key(ticker)?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DeleteSummary> {
                let ranges =
                    diesel::delete(ranges_dsl::ticker_ranges.filter(ranges_dsl::ticker.eq(&key)))
                        .execute(conn)
                        .into_core()?;
                let bars = diesel::delete(bars_dsl::ticker_data.filter(bars_dsl::ticker.eq(&key)))
                    .execute(conn)
                    .into_core()?;
                Ok(DeleteSummary { bars, ranges })
            })
            .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn query_bars(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>> {
        let key = ticker_key(ticker)?;
        let mut conn = get_connection(&self.pool)?;

        let rows = bars_dsl::ticker_data
            .filter(bars_dsl::ticker.eq(&key))
            .filter(bars_dsl::date.ge(format_date(start)))
            .filter(bars_dsl::date.le(format_date(end)))
            .order(bars_dsl::date.asc())
            .select(BarDB::as_select())
            .load::<BarDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(Bar::try_from).collect()
    }

    fn fetched_ranges(&self, ticker: &str) -> Result<Vec<FetchedRange>> {
        let key = ticker_key(ticker)?;
        let mut conn = get_connection(&self.pool)?;

        let rows = ranges_dsl::ticker_ranges
            .filter(ranges_dsl::ticker.eq(&key))
            .order((ranges_dsl::created_at.desc(), ranges_dsl::id.desc()))
            .select(FetchedRangeDB::as_select())
            .load::<FetchedRangeDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(FetchedRange::from).collect())
    }

    fn list_tickers_with_ranges(&self) -> Result<Vec<StoredTicker>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = ranges_dsl::ticker_ranges
            .order((
                ranges_dsl::ticker.asc(),
                ranges_dsl::created_at.desc(),
                ranges_dsl::id.desc(),
            ))
            .select(FetchedRangeDB::as_select())
            .load::<FetchedRangeDB>(&mut conn)
            .into_core()?;

        let mut tickers: Vec<StoredTicker> = Vec::new();
        for row in rows {
            let (Some(start_date), Some(end_date)) = (
                utc_date_from_millis(row.start_date),
                utc_date_from_millis(row.end_date),
            ) else {
                warn!(
                    "Skipping range {} of {} with out-of-range bounds",
                    row.id, row.ticker
                );
                continue;
            };

            let data_points = bars_dsl::ticker_data
                .filter(bars_dsl::ticker.eq(&row.ticker))
                .filter(bars_dsl::date.ge(format_date(start_date)))
                .filter(bars_dsl::date.le(format_date(end_date)))
                .count()
                .get_result::<i64>(&mut conn)
                .into_core()?;

            let range = StoredRange {
                start_date,
                end_date,
                start_ts: row.start_date,
                end_ts: row.end_date,
                created_at: row.created_at,
                data_points,
            };

            match tickers.last_mut() {
                Some(last) if last.ticker == row.ticker => last.ranges.push(range),
                _ => tickers.push(StoredTicker {
                    ticker: row.ticker,
                    ranges: vec![range],
                }),
            }
        }

        Ok(tickers)
    }
}
