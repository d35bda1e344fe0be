use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use log::{debug, info};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::fund_model::{FundConfig, FundSnapshot};
use super::fund_traits::{FundServiceTrait, LedgerRepositoryTrait};
use super::reconciliation;
use super::FundError;
use crate::errors::Result;
use crate::movements::{normalize_text, Movement, NewMovement, NewMovementRecord};
use crate::reports::{summarize_period, PeriodSummary};

/// Orchestrates the engine against the ledger store.
///
/// Every operation that reads the fund state and writes it back holds
/// `write_lock` for its whole duration, so two callers can never reconcile
/// against the same stale config.
pub struct FundService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    write_lock: Mutex<()>,
}

impl FundService {
    pub fn new(repository: Arc<dyn LedgerRepositoryTrait>) -> Self {
        FundService {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the active config, creating the default one on first use.
    /// Callers must hold `write_lock`.
    async fn load_or_init_config(&self) -> Result<FundConfig> {
        if let Some(record) = self.repository.load_config()? {
            return Ok(record.config);
        }
        let config = FundConfig::default();
        info!(
            "No fund config found, initializing with target {}",
            config.target_value
        );
        let record = self.repository.save_config(config).await?;
        Ok(record.config)
    }

    async fn replay_and_commit(&self, target_value: Decimal) -> Result<FundSnapshot> {
        let movements = self.repository.list_movements()?;
        let replay = reconciliation::recompute_from_history(target_value, &movements)?;
        self.repository
            .commit_replay(replay.config, replay.balance_updates())
            .await?;
        Ok(FundSnapshot {
            config: replay.config,
            movements: replay.movements,
        })
    }

    fn ensure_movement_exists(&self, movement_id: i64) -> Result<()> {
        if self.repository.get_movement(movement_id)?.is_none() {
            return Err(FundError::UnknownMovement(movement_id).into());
        }
        Ok(())
    }
}

#[async_trait]
impl FundServiceTrait for FundService {
    async fn get_fund(&self) -> Result<FundConfig> {
        if let Some(record) = self.repository.load_config()? {
            return Ok(record.config);
        }
        let _guard = self.write_lock.lock().await;
        self.load_or_init_config().await
    }

    fn list_movements(&self) -> Result<Vec<Movement>> {
        self.repository.list_movements()
    }

    async fn register_movement(&self, new_movement: NewMovement) -> Result<Movement> {
        new_movement.validate()?;
        let new_movement = new_movement.normalized();

        let _guard = self.write_lock.lock().await;
        let config = self.load_or_init_config().await?;
        let outcome =
            reconciliation::apply_movement(&config, new_movement.kind, new_movement.amount)?;

        let record = NewMovementRecord {
            timestamp: Local::now().naive_local(),
            kind: new_movement.kind,
            amount: new_movement.amount,
            responsible: new_movement.responsible,
            description: new_movement.description,
            resulting_balance: outcome.resulting_balance,
        };
        let movement = self
            .repository
            .record_movement(record, outcome.config)
            .await?;

        debug!(
            "Registered {} movement {} of {}, balance now {}",
            movement.kind, movement.id, movement.amount, movement.resulting_balance
        );
        Ok(movement)
    }

    async fn update_description(
        &self,
        movement_id: i64,
        description: Option<String>,
    ) -> Result<Movement> {
        let _guard = self.write_lock.lock().await;
        self.ensure_movement_exists(movement_id)?;
        self.repository
            .update_movement_description(movement_id, normalize_text(description))
            .await
    }

    async fn delete_movement(&self, movement_id: i64) -> Result<FundSnapshot> {
        let _guard = self.write_lock.lock().await;
        self.ensure_movement_exists(movement_id)?;
        let config = self.load_or_init_config().await?;

        let remaining: Vec<Movement> = self
            .repository
            .list_movements()?
            .into_iter()
            .filter(|m| m.id != movement_id)
            .collect();
        let replay = reconciliation::recompute_from_history(config.target_value, &remaining)?;

        self.repository
            .delete_and_replay(movement_id, replay.config, replay.balance_updates())
            .await?;
        info!(
            "Deleted movement {}, replayed {} remaining",
            movement_id,
            replay.movements.len()
        );

        Ok(FundSnapshot {
            config: replay.config,
            movements: replay.movements,
        })
    }

    async fn reconfigure(&self, new_target_value: Decimal) -> Result<FundConfig> {
        let _guard = self.write_lock.lock().await;
        let config = self.load_or_init_config().await?;
        let next = reconciliation::reconfigure(&config, new_target_value)?;
        let record = self.repository.save_config(next).await?;
        info!(
            "Fund target changed from {} to {}",
            config.target_value, record.config.target_value
        );
        Ok(record.config)
    }

    async fn recalculate(&self) -> Result<FundSnapshot> {
        let _guard = self.write_lock.lock().await;
        let config = self.load_or_init_config().await?;
        let snapshot = self.replay_and_commit(config.target_value).await?;
        if snapshot.config != config {
            info!(
                "Recalculation corrected fund state: balance {} -> {}",
                config.current_balance, snapshot.config.current_balance
            );
        }
        Ok(snapshot)
    }

    fn period_summary(&self, from: NaiveDate, to: NaiveDate) -> Result<PeriodSummary> {
        let movements = self.repository.list_movements()?;
        summarize_period(&movements, from, to)
    }
}
