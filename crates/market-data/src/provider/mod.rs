//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait the ticker cache depends on
//! - The Polygon.io implementation

mod traits;

pub mod polygon;

pub use traits::MarketDataProvider;
