//! Request and response bodies for the HTTP API.

use fixedfund_core::errors::{Error as CoreError, Result as CoreResult};
use fixedfund_core::fund::{FundConfig, FundError, FundSnapshot};
use fixedfund_core::movements::{ensure_positive_amount, parse_amount, Movement, MovementKind};
use fixedfund_core::NewMovement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount sent either as a JSON number or as typed text such as `"12,50"`.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum AmountInput {
    Number(Decimal),
    Text(String),
}

impl AmountInput {
    pub fn resolve(self) -> CoreResult<Decimal> {
        match self {
            AmountInput::Number(amount) => {
                ensure_positive_amount(amount)?;
                Ok(amount)
            }
            AmountInput::Text(text) => parse_amount(&text),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewMovementRequest {
    pub kind: MovementKind,
    pub amount: AmountInput,
    pub responsible: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<NewMovementRequest> for NewMovement {
    type Error = CoreError;

    fn try_from(req: NewMovementRequest) -> CoreResult<Self> {
        Ok(NewMovement {
            kind: req.kind,
            amount: req.amount.resolve()?,
            responsible: req.responsible,
            description: req.description,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TargetUpdate {
    pub target_value: AmountInput,
}

impl TargetUpdate {
    /// Resolves the new target, reporting bad values as `InvalidTarget`.
    pub fn resolve(self) -> CoreResult<Decimal> {
        self.target_value.resolve().map_err(|e| match e {
            CoreError::Fund(FundError::InvalidAmount(msg)) => {
                CoreError::Fund(FundError::InvalidTarget(msg))
            }
            other => other,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DescriptionUpdate {
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PeriodQuery {
    pub from: String,
    pub to: String,
    /// `json` (default) or `text`
    pub format: Option<String>,
}

/// Fund state plus the movement list, newest first, as a screen redraws it.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FundView {
    pub config: FundConfig,
    pub movements: Vec<Movement>,
}

impl FundView {
    pub fn new(config: FundConfig, mut movements: Vec<Movement>) -> Self {
        movements.sort_by(|a, b| b.id.cmp(&a.id));
        Self { config, movements }
    }
}

impl From<FundSnapshot> for FundView {
    fn from(snapshot: FundSnapshot) -> Self {
        Self::new(snapshot.config, snapshot.movements)
    }
}
