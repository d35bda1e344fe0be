//! Movement domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Result;
use crate::fund::FundError;

/// Direction of a cash movement through the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Cash entering the drawer
    Inflow,
    /// Cash leaving the drawer
    Outflow,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inflow => "INFLOW",
            MovementKind::Outflow => "OUTFLOW",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Legacy rows were labelled "Entrada" / "Saída".
        match s.trim() {
            "INFLOW" | "Inflow" | "inflow" | "Entrada" => Ok(MovementKind::Inflow),
            "OUTFLOW" | "Outflow" | "outflow" | "Saída" | "Saida" => Ok(MovementKind::Outflow),
            other => Err(format!("Unknown movement kind: {}", other)),
        }
    }
}

/// Domain model representing one recorded cash event.
///
/// Everything except `description` is fixed once the movement is stored.
/// `resulting_balance` is a display snapshot and gets rewritten on every
/// history replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub resulting_balance: Decimal,
}

/// Input model for registering a new movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub kind: MovementKind,
    pub amount: Decimal,
    pub responsible: Option<String>,
    pub description: Option<String>,
}

impl NewMovement {
    /// Validates the movement input.
    pub fn validate(&self) -> Result<()> {
        ensure_positive_amount(self.amount)
    }

    /// Returns a copy with free-text fields trimmed and blanks dropped.
    pub fn normalized(self) -> Self {
        Self {
            responsible: normalize_text(self.responsible),
            description: normalize_text(self.description),
            ..self
        }
    }
}

/// A movement that has been reconciled and is ready to be stored.
///
/// The store assigns the id on insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovementRecord {
    pub timestamp: NaiveDateTime,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub resulting_balance: Decimal,
}

/// Rejects zero and negative amounts.
pub fn ensure_positive_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(FundError::InvalidAmount(format!(
            "amount must be greater than zero, got {}",
            amount
        ))
        .into());
    }
    Ok(())
}

/// Parses a user-typed currency amount.
///
/// Accepts an optional `R$`/`$` prefix and either `,` or `.` as the decimal
/// separator. When both separators appear the last one is the decimal mark.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input
        .trim()
        .trim_start_matches("R$")
        .trim_start_matches('$')
        .trim();
    if trimmed.is_empty() {
        return Err(FundError::InvalidAmount("amount is empty".to_string()).into());
    }

    let canonical = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => trimmed.replace(',', ""),
        (Some(_), None) => trimmed.replace(',', "."),
        _ => trimmed.to_string(),
    };

    let amount = Decimal::from_str(&canonical).map_err(|e| {
        FundError::InvalidAmount(format!("'{}' is not a number ({})", input.trim(), e))
    })?;
    ensure_positive_amount(amount)?;
    Ok(amount)
}

/// Trims optional free text, mapping blank input to `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
