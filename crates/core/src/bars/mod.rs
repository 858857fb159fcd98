//! Daily bar cache module.
//!
//! This module provides the core types and traits for caching daily OHLCV bars:
//!
//! - [`model`] - Bars, fetched ranges and the combined result handed to callers
//! - [`store`] - Storage trait for persisting and querying bars and ranges
//! - [`import`] - Normalization of provider aggregates into bars
//! - [`coverage`] - Missing-day detection, fetch planning and merging
//! - [`summary`] - Summary statistics over a series
//! - [`service`] - The gap-filling retrieval service
//! - [`errors`] - Market data errors as seen by the domain
//!
//! # Architecture
//!
//! ```text
//! TickerService ──► coverage (plan) ──► MarketDataProvider (missing span only)
//!       │                                        │
//!       └──────► BarStore (query / save_fetch) ◄─┘
//! ```

pub mod coverage;
pub mod errors;
pub mod import;
pub mod model;
pub mod service;
pub mod store;
pub mod summary;


// Re-export commonly used types for convenience
pub use errors::MarketDataError;
pub use model::{
    Bar, DataOrigin, DeleteSummary, FetchedRange, SeriesSummary, StoredRange, StoredTicker,
    TickerData,
};
pub use service::{StatusCallback, TickerService};
pub use store::BarStore;
