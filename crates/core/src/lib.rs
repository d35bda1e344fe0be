//! Fixed Fund Core - reconciliation engine, domain entities, services, and traits.
//!
//! This crate contains the business logic for keeping a petty-cash drawer
//! reconciled against its fixed target. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod fund;
pub mod movements;
pub mod reports;

pub use fund::{FundConfig, FundError, FundSnapshot};
pub use movements::{Movement, MovementKind, NewMovement};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
