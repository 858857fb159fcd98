//! Market data models
//!
//! - `bar` - Daily aggregate as reported by the provider (RawBar)
//! - `details` - Ticker reference data (TickerDetails)

mod bar;
mod details;

pub use bar::RawBar;
pub use details::TickerDetails;
