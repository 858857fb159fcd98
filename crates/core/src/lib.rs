//! Stockdash Core - Domain entities, services, and traits.
//!
//! This crate contains the ticker cache's business logic: input validators,
//! the bar model, the storage trait and the gap-filling retrieval service.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.
//!
//! ```text
//!   caller ──► TickerService ──► BarStore (trait) ──► storage-sqlite
//!                   │
//!                   └──────────► MarketDataProvider (trait) ──► Polygon.io
//! ```

pub mod bars;
pub mod constants;
pub mod errors;
pub mod utils;
pub mod validation;

// Re-export the types most callers need
pub use bars::{
    Bar, BarStore, DataOrigin, DeleteSummary, FetchedRange, SeriesSummary, StoredRange,
    StoredTicker, TickerData, TickerService,
};
pub use validation::ValidationResult;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
