//! SQLite ledger store for the fixed-fund engine.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements `LedgerRepositoryTrait` from `fixedfund-core`
//! and contains:
//! - Database connection pooling and the single-writer actor
//! - Embedded Diesel migrations
//! - Database-specific model types (with Diesel derives)
//!
//! ```text
//!        core (engine + service)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod fund;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};
pub use fund::LedgerRepository;

// Re-export from fixedfund-core for convenience
pub use fixedfund_core::errors::{DatabaseError, Error, Result};
