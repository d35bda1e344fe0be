//! Fund domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::FundError;
use crate::constants::DEFAULT_TARGET_VALUE;
use crate::errors::Result;
use crate::movements::Movement;

/// State of the cash drawer against its fixed target.
///
/// This is a plain value: every engine operation takes one by reference and
/// hands back a new one, so independent copies never observe each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundConfig {
    /// Amount the drawer must hold at rest.
    pub target_value: Decimal,
    /// Real cash currently in the drawer.
    pub current_balance: Decimal,
    /// Cash above the target earmarked for deposit.
    pub pending_deposit: Decimal,
    /// Shortfall below the target awaiting replenishment.
    pub pending_replenishment: Decimal,
}

impl FundConfig {
    /// A fund at rest: the drawer holds exactly `target_value`.
    pub fn new(target_value: Decimal) -> Self {
        Self {
            target_value,
            current_balance: target_value,
            pending_deposit: Decimal::ZERO,
            pending_replenishment: Decimal::ZERO,
        }
    }

    /// True when nothing is owed in either direction and the drawer is full.
    pub fn is_at_rest(&self) -> bool {
        self.pending_deposit.is_zero()
            && self.pending_replenishment.is_zero()
            && self.current_balance == self.target_value
    }

    /// Checks the field-level constraints of a stored config.
    pub fn validate(&self) -> Result<()> {
        if self.target_value <= Decimal::ZERO {
            return Err(FundError::InvalidTarget(format!(
                "target value must be greater than zero, got {}",
                self.target_value
            ))
            .into());
        }
        if self.pending_deposit < Decimal::ZERO || self.pending_replenishment < Decimal::ZERO {
            return Err(crate::Error::Unexpected(format!(
                "pending amounts cannot be negative (deposit {}, replenishment {})",
                self.pending_deposit, self.pending_replenishment
            )));
        }
        Ok(())
    }
}

impl Default for FundConfig {
    fn default() -> Self {
        let target = Decimal::from_str(DEFAULT_TARGET_VALUE).unwrap_or(Decimal::ONE_THOUSAND);
        Self::new(target)
    }
}

/// A persisted config row. Only the row with the highest id is active;
/// older rows are kept as history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundConfigRecord {
    pub id: i64,
    #[serde(flatten)]
    pub config: FundConfig,
    pub updated_at: NaiveDateTime,
}

/// Result of applying a single movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementOutcome {
    pub config: FundConfig,
    /// Balance to snapshot on the movement row.
    pub resulting_balance: Decimal,
}

/// Result of replaying the whole movement history.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub config: FundConfig,
    /// Movements in id order with refreshed `resulting_balance` values.
    pub movements: Vec<Movement>,
}

impl Replay {
    /// `(id, resulting_balance)` pairs ready to be written back.
    pub fn balance_updates(&self) -> Vec<(i64, Decimal)> {
        self.movements
            .iter()
            .map(|m| (m.id, m.resulting_balance))
            .collect()
    }
}

/// What a caller needs to redraw after a structural change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSnapshot {
    pub config: FundConfig,
    pub movements: Vec<Movement>,
}
