//! Stockdash Market Data Crate
//!
//! This crate is the remote side of the ticker cache: it knows how to ask a
//! third-party market data provider for daily OHLCV aggregates and for basic
//! ticker details, and how to classify everything that can go wrong while
//! doing so.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +----------------------+
//! |  TickerService   | --> |  MarketDataProvider  |  (trait, this crate)
//! |  (stockdash-core)|     +----------------------+
//! +------------------+                |
//!                                     v
//!                          +----------------------+
//!                          |   PolygonProvider    |  (reqwest, 30s timeout)
//!                          +----------------------+
//!                                     |
//!                                     v
//!                          +----------------------+
//!                          |   Vec<RawBar>        |  ({t, o, h, l, c, v, vw})
//!                          +----------------------+
//! ```
//!
//! # Core Types
//!
//! - [`RawBar`] - One aggregate exactly as the provider reported it
//! - [`TickerDetails`] - Reference data for a ticker (company name, ...)
//! - [`MarketDataError`] - Rate limiting, connection, provider and payload failures
//! - [`MarketDataProvider`] - The narrow contract the cache relies on

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{RawBar, TickerDetails};
pub use provider::polygon::PolygonProvider;
pub use provider::MarketDataProvider;
