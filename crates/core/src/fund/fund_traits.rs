use crate::errors::Result;
use crate::fund::fund_model::{FundConfig, FundConfigRecord, FundSnapshot};
use crate::movements::{Movement, NewMovement, NewMovementRecord};
use crate::reports::PeriodSummary;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trait for ledger store operations.
///
/// Reads are synchronous against a pooled connection; writes are async and
/// each one commits in a single transaction.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Returns the active (latest) config row, if one was ever saved.
    fn load_config(&self) -> Result<Option<FundConfigRecord>>;
    /// Saves a new config row that supersedes the previous one.
    async fn save_config(&self, config: FundConfig) -> Result<FundConfigRecord>;

    fn list_movements(&self) -> Result<Vec<Movement>>;
    fn get_movement(&self, movement_id: i64) -> Result<Option<Movement>>;
    async fn insert_movement(&self, record: NewMovementRecord) -> Result<Movement>;
    async fn update_movement_description(
        &self,
        movement_id: i64,
        description: Option<String>,
    ) -> Result<Movement>;

    /// Inserts the movement and saves `config` in one transaction.
    async fn record_movement(
        &self,
        record: NewMovementRecord,
        config: FundConfig,
    ) -> Result<Movement>;

    /// Rewrites the `resulting_balance` snapshots and saves `config` in one
    /// transaction.
    async fn commit_replay(
        &self,
        config: FundConfig,
        balance_updates: Vec<(i64, Decimal)>,
    ) -> Result<()>;

    /// Deletes the movement, rewrites the remaining snapshots and saves
    /// `config` in one transaction. Fails with `UnknownMovement`, writing
    /// nothing, when the id is not stored.
    async fn delete_and_replay(
        &self,
        movement_id: i64,
        config: FundConfig,
        balance_updates: Vec<(i64, Decimal)>,
    ) -> Result<()>;
}

/// Trait for fund service operations
#[async_trait]
pub trait FundServiceTrait: Send + Sync {
    async fn get_fund(&self) -> Result<FundConfig>;
    fn list_movements(&self) -> Result<Vec<Movement>>;
    async fn register_movement(&self, new_movement: NewMovement) -> Result<Movement>;
    async fn update_description(
        &self,
        movement_id: i64,
        description: Option<String>,
    ) -> Result<Movement>;
    async fn delete_movement(&self, movement_id: i64) -> Result<FundSnapshot>;
    async fn reconfigure(&self, new_target_value: Decimal) -> Result<FundConfig>;
    async fn recalculate(&self) -> Result<FundSnapshot>;
    fn period_summary(&self, from: NaiveDate, to: NaiveDate) -> Result<PeriodSummary>;
}
