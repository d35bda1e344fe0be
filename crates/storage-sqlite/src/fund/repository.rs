use async_trait::async_trait;
use chrono::Local;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use fixedfund_core::fund::{FundConfig, FundConfigRecord, FundError, LedgerRepositoryTrait};
use fixedfund_core::movements::{Movement, NewMovementRecord};
use fixedfund_core::{Error, Result};

use super::model::{FundConfigDB, MovementDB, NewFundConfigDB, NewMovementDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{fund_config, movements};

/// SQLite-backed ledger store.
///
/// Reads go through the pool; every write is a job on the single writer so
/// that each trait method commits in exactly one transaction.
pub struct LedgerRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        LedgerRepository { pool, writer }
    }

    fn insert_config(
        conn: &mut SqliteConnection,
        config: &FundConfig,
    ) -> Result<FundConfigRecord> {
        config.validate()?;
        let row = NewFundConfigDB::from_config(config, Local::now().naive_local());
        let saved = diesel::insert_into(fund_config::table)
            .values(&row)
            .returning(FundConfigDB::as_returning())
            .get_result(conn)
            .map_err(StorageError::from)?;
        Ok(FundConfigRecord::try_from(saved)?)
    }

    fn insert_movement_row(
        conn: &mut SqliteConnection,
        record: NewMovementRecord,
    ) -> Result<Movement> {
        let row: NewMovementDB = record.into();
        let saved = diesel::insert_into(movements::table)
            .values(&row)
            .returning(MovementDB::as_returning())
            .get_result(conn)
            .map_err(StorageError::from)?;
        Ok(Movement::try_from(saved)?)
    }

    fn rewrite_snapshots(
        conn: &mut SqliteConnection,
        balance_updates: Vec<(i64, Decimal)>,
    ) -> Result<()> {
        for (movement_id, balance) in balance_updates {
            diesel::update(movements::table.find(movement_id))
                .set(movements::resulting_balance.eq(balance.to_string()))
                .execute(conn)
                .map_err(StorageError::from)?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    fn load_config(&self) -> Result<Option<FundConfigRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let latest = fund_config::table
            .order(fund_config::id.desc())
            .select(FundConfigDB::as_select())
            .first::<FundConfigDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(latest.map(FundConfigRecord::try_from).transpose()?)
    }

    async fn save_config(&self, config: FundConfig) -> Result<FundConfigRecord> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FundConfigRecord> {
                Self::insert_config(conn, &config)
            })
            .await
    }

    fn list_movements(&self) -> Result<Vec<Movement>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = movements::table
            .order(movements::id.asc())
            .select(MovementDB::as_select())
            .load::<MovementDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Movement::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_movement(&self, movement_id: i64) -> Result<Option<Movement>> {
        let mut conn = get_connection(&self.pool)?;
        let row = movements::table
            .find(movement_id)
            .select(MovementDB::as_select())
            .first::<MovementDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Movement::try_from).transpose()?)
    }

    async fn insert_movement(&self, record: NewMovementRecord) -> Result<Movement> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Movement> {
                Self::insert_movement_row(conn, record)
            })
            .await
    }

    async fn update_movement_description(
        &self,
        movement_id: i64,
        description: Option<String>,
    ) -> Result<Movement> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Movement> {
                let updated = diesel::update(movements::table.find(movement_id))
                    .set(movements::description.eq(description))
                    .returning(MovementDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                match updated {
                    Some(row) => Ok(Movement::try_from(row)?),
                    None => Err(FundError::UnknownMovement(movement_id).into()),
                }
            })
            .await
    }

    async fn record_movement(
        &self,
        record: NewMovementRecord,
        config: FundConfig,
    ) -> Result<Movement> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Movement> {
                let movement = Self::insert_movement_row(conn, record)?;
                Self::insert_config(conn, &config)?;
                Ok(movement)
            })
            .await
    }

    async fn commit_replay(
        &self,
        config: FundConfig,
        balance_updates: Vec<(i64, Decimal)>,
    ) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let count = balance_updates.len();
                Self::rewrite_snapshots(conn, balance_updates)?;
                Self::insert_config(conn, &config)?;
                debug!("Committed replay of {} movement snapshots", count);
                Ok(())
            })
            .await
    }

    async fn delete_and_replay(
        &self,
        movement_id: i64,
        config: FundConfig,
        balance_updates: Vec<(i64, Decimal)>,
    ) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let deleted = diesel::delete(movements::table.find(movement_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(FundError::UnknownMovement(movement_id).into());
                }
                let count = balance_updates.len();
                Self::rewrite_snapshots(conn, balance_updates)?;
                Self::insert_config(conn, &config)?;
                debug!(
                    "Deleted movement {} and committed {} replayed snapshots",
                    movement_id, count
                );
                Ok(())
            })
            .await
    }
}
