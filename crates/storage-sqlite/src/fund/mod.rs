mod model;
mod repository;

pub use model::{FundConfigDB, MovementDB, NewFundConfigDB, NewMovementDB};
pub use repository::LedgerRepository;
