//! Fixed fund module - reconciliation engine, models, services, and traits.

mod fund_errors;
mod fund_model;
mod fund_service;
mod fund_traits;
pub mod reconciliation;

#[cfg(test)]
mod fund_service_tests;

pub use fund_errors::FundError;
pub use fund_model::{FundConfig, FundConfigRecord, FundSnapshot, MovementOutcome, Replay};
pub use fund_service::FundService;
pub use fund_traits::{FundServiceTrait, LedgerRepositoryTrait};
pub use reconciliation::{
    apply_inflow, apply_movement, apply_outflow, reconfigure, recompute_from_history,
};
