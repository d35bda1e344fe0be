//! Fund error types.
//!
//! These are the recoverable rejections a caller can receive when asking the
//! fund to change. None of them leaves the fund partially updated.

use thiserror::Error;

/// Errors specific to fixed-fund operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundError {
    /// Amount was zero, negative or could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Target value was zero or negative.
    #[error("Invalid target value: {0}")]
    InvalidTarget(String),

    /// An edit or delete referenced a movement id the store does not hold.
    #[error("Movement {0} does not exist")]
    UnknownMovement(i64),
}

impl FundError {
    /// True for rejections caused by bad input values.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FundError::InvalidAmount(_) | FundError::InvalidTarget(_)
        )
    }

    /// True when the referenced movement was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FundError::UnknownMovement(_))
    }
}
