//! Database models for the bar cache.

use chrono::NaiveDate;
use diesel::prelude::*;

use stockdash_core::bars::store::parse_storage_date;
use stockdash_core::bars::{Bar, FetchedRange};
use stockdash_core::constants::ISO_DATE_FORMAT;
use stockdash_core::errors::Error;

/// Database model for stored bars
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::ticker_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BarDB {
    pub id: i32,
    pub ticker: String,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub vwap: Option<f64>,
}

/// Insertable bar row; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::ticker_data)]
pub struct NewBarDB {
    pub ticker: String,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub vwap: Option<f64>,
}

/// Database model for fetched ranges
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::ticker_ranges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FetchedRangeDB {
    pub id: i32,
    pub ticker: String,
    pub start_date: i64,
    pub end_date: i64,
    pub created_at: i64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::ticker_ranges)]
pub struct NewFetchedRangeDB {
    pub ticker: String,
    pub start_date: i64,
    pub end_date: i64,
    pub created_at: i64,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

impl From<&Bar> for NewBarDB {
    fn from(bar: &Bar) -> Self {
        Self {
            ticker: bar.ticker.clone(),
            date: format_date(bar.date),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            vwap: bar.vwap,
        }
    }
}

impl TryFrom<BarDB> for Bar {
    type Error = Error;

    fn try_from(db: BarDB) -> Result<Self, Self::Error> {
        Ok(Bar {
            date: parse_storage_date(&db.date)?,
            ticker: db.ticker,
            open: db.open,
            high: db.high,
            low: db.low,
            close: db.close,
            volume: db.volume,
            vwap: db.vwap,
        })
    }
}

impl From<FetchedRangeDB> for FetchedRange {
    fn from(db: FetchedRangeDB) -> Self {
        Self {
            ticker: db.ticker,
            start_ts: db.start_date,
            end_ts: db.end_date,
            created_at: db.created_at,
        }
    }
}
