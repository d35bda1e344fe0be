//! Database models for the fund ledger.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use fixedfund_core::fund::{FundConfig, FundConfigRecord};
use fixedfund_core::movements::{Movement, MovementKind, NewMovementRecord};

use crate::errors::StorageError;

fn parse_stored_decimal(value: &str, field: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::MalformedValue(format!("{} '{}' is not a decimal: {}", field, value, e))
    })
}

/// Database model for a fund config row
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::fund_config)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FundConfigDB {
    pub id: i64,
    pub target_value: String,
    pub current_balance: String,
    pub pending_deposit: String,
    pub pending_replenishment: String,
    pub updated_at: NaiveDateTime,
}

/// Database model for inserting a fund config row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::fund_config)]
pub struct NewFundConfigDB {
    pub target_value: String,
    pub current_balance: String,
    pub pending_deposit: String,
    pub pending_replenishment: String,
    pub updated_at: NaiveDateTime,
}

impl NewFundConfigDB {
    pub fn from_config(config: &FundConfig, updated_at: NaiveDateTime) -> Self {
        Self {
            target_value: config.target_value.to_string(),
            current_balance: config.current_balance.to_string(),
            pending_deposit: config.pending_deposit.to_string(),
            pending_replenishment: config.pending_replenishment.to_string(),
            updated_at,
        }
    }
}

impl TryFrom<FundConfigDB> for FundConfigRecord {
    type Error = StorageError;

    fn try_from(db: FundConfigDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            config: FundConfig {
                target_value: parse_stored_decimal(&db.target_value, "target_value")?,
                current_balance: parse_stored_decimal(&db.current_balance, "current_balance")?,
                pending_deposit: parse_stored_decimal(&db.pending_deposit, "pending_deposit")?,
                pending_replenishment: parse_stored_decimal(
                    &db.pending_replenishment,
                    "pending_replenishment",
                )?,
            },
            updated_at: db.updated_at,
        })
    }
}

/// Database model for movements
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::movements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MovementDB {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub kind: String,
    pub amount: String,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub resulting_balance: String,
}

/// Database model for inserting a movement; the id comes from SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::movements)]
pub struct NewMovementDB {
    pub timestamp: NaiveDateTime,
    pub kind: String,
    pub amount: String,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub resulting_balance: String,
}

impl From<NewMovementRecord> for NewMovementDB {
    fn from(domain: NewMovementRecord) -> Self {
        Self {
            timestamp: domain.timestamp,
            kind: domain.kind.as_str().to_string(),
            amount: domain.amount.to_string(),
            responsible: domain.responsible,
            description: domain.description,
            resulting_balance: domain.resulting_balance.to_string(),
        }
    }
}

impl TryFrom<MovementDB> for Movement {
    type Error = StorageError;

    fn try_from(db: MovementDB) -> Result<Self, Self::Error> {
        let kind = MovementKind::from_str(&db.kind).map_err(StorageError::MalformedValue)?;
        Ok(Self {
            id: db.id,
            timestamp: db.timestamp,
            kind,
            amount: parse_stored_decimal(&db.amount, "amount")?,
            responsible: db.responsible,
            description: db.description,
            resulting_balance: parse_stored_decimal(&db.resulting_balance, "resulting_balance")?,
        })
    }
}
