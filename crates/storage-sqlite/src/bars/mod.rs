//! Bar cache storage: daily bars and the fetched range log.

mod model;
mod repository;

pub use model::{BarDB, FetchedRangeDB, NewBarDB, NewFetchedRangeDB};
pub use repository::BarRepository;
