//! SQLite storage implementation for the stockdash ticker cache.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the `BarStore` trait defined in `stockdash-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - A single writer actor running each write in one transaction
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//!
//! ```text
//!        core (domain, BarStore trait)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!           reads: r2d2 pool (8)
//!           writes: WriteHandle ──► writer task ──► IMMEDIATE transaction
//!                  │
//!                  ▼
//!              tickers.db
//! ```

pub mod bars;
pub mod db;
pub mod errors;
pub mod schema;

pub use bars::BarRepository;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle, DB_FILE_NAME,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from stockdash-core for convenience
pub use stockdash_core::errors::{DatabaseError, Error, Result};
