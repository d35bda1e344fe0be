#[cfg(test)]
mod tests {
    use crate::errors::{DatabaseError, Error, Result};
    use crate::fund::{
        FundConfig, FundConfigRecord, FundError, FundService, FundServiceTrait,
        LedgerRepositoryTrait,
    };
    use crate::movements::{Movement, MovementKind, NewMovement, NewMovementRecord};
    use async_trait::async_trait;
    use chrono::{Local, NaiveDate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock LedgerRepository ---
    #[derive(Default)]
    struct LedgerState {
        configs: Vec<FundConfigRecord>,
        movements: Vec<Movement>,
        next_movement_id: i64,
        refuse_writes: bool,
    }

    #[derive(Clone, Default)]
    struct MockLedgerRepository {
        state: Arc<Mutex<LedgerState>>,
    }

    impl MockLedgerRepository {
        fn new() -> Self {
            Self::default()
        }

        fn config_history_len(&self) -> usize {
            self.state.lock().unwrap().configs.len()
        }

        fn push_config(state: &mut LedgerState, config: FundConfig) -> FundConfigRecord {
            let record = FundConfigRecord {
                id: state.configs.len() as i64 + 1,
                config,
                updated_at: Local::now().naive_local(),
            };
            state.configs.push(record.clone());
            record
        }

        fn push_movement(state: &mut LedgerState, record: NewMovementRecord) -> Movement {
            state.next_movement_id += 1;
            let movement = Movement {
                id: state.next_movement_id,
                timestamp: record.timestamp,
                kind: record.kind,
                amount: record.amount,
                responsible: record.responsible,
                description: record.description,
                resulting_balance: record.resulting_balance,
            };
            state.movements.push(movement.clone());
            movement
        }

        /// Makes every later write fail before touching any state, the way a
        /// rolled-back transaction leaves the store.
        fn refuse_writes(&self) {
            self.state.lock().unwrap().refuse_writes = true;
        }

        fn ensure_writable(state: &LedgerState) -> Result<()> {
            if state.refuse_writes {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "disk I/O error".to_string(),
                )));
            }
            Ok(())
        }

        /// Overwrites the active config without touching movements, as a
        /// partial write would.
        fn corrupt_config(&self, config: FundConfig) {
            let mut state = self.state.lock().unwrap();
            Self::push_config(&mut state, config);
        }
    }

    #[async_trait]
    impl LedgerRepositoryTrait for MockLedgerRepository {
        fn load_config(&self) -> Result<Option<FundConfigRecord>> {
            Ok(self.state.lock().unwrap().configs.last().cloned())
        }

        async fn save_config(&self, config: FundConfig) -> Result<FundConfigRecord> {
            let mut state = self.state.lock().unwrap();
            Ok(Self::push_config(&mut state, config))
        }

        fn list_movements(&self) -> Result<Vec<Movement>> {
            Ok(self.state.lock().unwrap().movements.clone())
        }

        fn get_movement(&self, movement_id: i64) -> Result<Option<Movement>> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .movements
                .iter()
                .find(|m| m.id == movement_id)
                .cloned())
        }

        async fn insert_movement(&self, record: NewMovementRecord) -> Result<Movement> {
            let mut state = self.state.lock().unwrap();
            Ok(Self::push_movement(&mut state, record))
        }

        async fn update_movement_description(
            &self,
            movement_id: i64,
            description: Option<String>,
        ) -> Result<Movement> {
            let mut state = self.state.lock().unwrap();
            let movement = state
                .movements
                .iter_mut()
                .find(|m| m.id == movement_id)
                .ok_or(Error::Fund(FundError::UnknownMovement(movement_id)))?;
            movement.description = description;
            Ok(movement.clone())
        }

        async fn record_movement(
            &self,
            record: NewMovementRecord,
            config: FundConfig,
        ) -> Result<Movement> {
            let mut state = self.state.lock().unwrap();
            let movement = Self::push_movement(&mut state, record);
            Self::push_config(&mut state, config);
            Ok(movement)
        }

        async fn commit_replay(
            &self,
            config: FundConfig,
            balance_updates: Vec<(i64, Decimal)>,
        ) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            Self::ensure_writable(&state)?;
            for (id, balance) in balance_updates {
                if let Some(m) = state.movements.iter_mut().find(|m| m.id == id) {
                    m.resulting_balance = balance;
                }
            }
            Self::push_config(&mut state, config);
            Ok(())
        }

        async fn delete_and_replay(
            &self,
            movement_id: i64,
            config: FundConfig,
            balance_updates: Vec<(i64, Decimal)>,
        ) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            Self::ensure_writable(&state)?;
            if !state.movements.iter().any(|m| m.id == movement_id) {
                return Err(Error::Fund(FundError::UnknownMovement(movement_id)));
            }
            state.movements.retain(|m| m.id != movement_id);
            for (id, balance) in balance_updates {
                if let Some(m) = state.movements.iter_mut().find(|m| m.id == id) {
                    m.resulting_balance = balance;
                }
            }
            Self::push_config(&mut state, config);
            Ok(())
        }
    }

    fn setup() -> (MockLedgerRepository, FundService) {
        let repository = MockLedgerRepository::new();
        let service = FundService::new(Arc::new(repository.clone()));
        (repository, service)
    }

    fn inflow(amount: Decimal) -> NewMovement {
        NewMovement {
            kind: MovementKind::Inflow,
            amount,
            responsible: None,
            description: None,
        }
    }

    fn outflow(amount: Decimal) -> NewMovement {
        NewMovement {
            kind: MovementKind::Outflow,
            amount,
            responsible: Some("  Ana ".to_string()),
            description: Some("Taxi".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_fund_initializes_default_config_once() {
        let (repository, service) = setup();

        let config = service.get_fund().await.unwrap();
        assert_eq!(config, FundConfig::new(dec!(1000.00)));
        assert_eq!(repository.config_history_len(), 1);

        service.get_fund().await.unwrap();
        assert_eq!(repository.config_history_len(), 1);
    }

    #[tokio::test]
    async fn test_register_movement_persists_movement_and_config() {
        let (repository, service) = setup();

        let first = service.register_movement(inflow(dec!(500))).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.resulting_balance, dec!(1500));

        let second = service.register_movement(outflow(dec!(800))).await.unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(second.resulting_balance, dec!(1200));
        assert_eq!(second.responsible.as_deref(), Some("Ana"));

        let config = service.get_fund().await.unwrap();
        assert_eq!(config.current_balance, dec!(1200));
        assert_eq!(config.pending_deposit, dec!(0));
        assert_eq!(config.pending_replenishment, dec!(0));
        // default + one row per movement
        assert_eq!(repository.config_history_len(), 3);
    }

    #[tokio::test]
    async fn test_register_movement_rejects_non_positive_amount() {
        let (repository, service) = setup();
        service.get_fund().await.unwrap();

        let err = service.register_movement(inflow(dec!(0))).await.unwrap_err();
        assert!(matches!(err, Error::Fund(FundError::InvalidAmount(_))));
        assert!(service.list_movements().unwrap().is_empty());
        assert_eq!(repository.config_history_len(), 1);
    }

    #[tokio::test]
    async fn test_update_description_does_not_reconcile() {
        let (repository, service) = setup();
        let movement = service.register_movement(outflow(dec!(300))).await.unwrap();
        let history_before = repository.config_history_len();

        let updated = service
            .update_description(movement.id, Some("  Office supplies ".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Office supplies"));
        assert_eq!(updated.resulting_balance, dec!(700));
        assert_eq!(repository.config_history_len(), history_before);

        let cleared = service
            .update_description(movement.id, Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn test_update_description_unknown_movement() {
        let (_repository, service) = setup();
        let err = service
            .update_description(99, Some("x".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fund(FundError::UnknownMovement(99))));
    }

    #[tokio::test]
    async fn test_delete_movement_replays_remaining_history() {
        let (_repository, service) = setup();
        let first = service.register_movement(inflow(dec!(500))).await.unwrap();
        service.register_movement(outflow(dec!(800))).await.unwrap();
        service.register_movement(outflow(dec!(100))).await.unwrap();

        let snapshot = service.delete_movement(first.id).await.unwrap();

        assert_eq!(snapshot.config.current_balance, dec!(100));
        assert_eq!(snapshot.config.pending_replenishment, dec!(900));
        assert_eq!(snapshot.config.pending_deposit, dec!(0));
        let balances: Vec<(i64, Decimal)> = snapshot
            .movements
            .iter()
            .map(|m| (m.id, m.resulting_balance))
            .collect();
        assert_eq!(balances, vec![(2, dec!(200)), (3, dec!(100))]);

        // The store now agrees with the snapshot.
        let stored = service.list_movements().unwrap();
        assert_eq!(stored, snapshot.movements);
        assert_eq!(service.get_fund().await.unwrap(), snapshot.config);
    }

    #[tokio::test]
    async fn test_delete_unknown_movement_leaves_store_untouched() {
        let (repository, service) = setup();
        service.register_movement(inflow(dec!(10))).await.unwrap();
        let history_before = repository.config_history_len();

        let err = service.delete_movement(42).await.unwrap_err();
        assert!(matches!(err, Error::Fund(FundError::UnknownMovement(42))));
        assert_eq!(service.list_movements().unwrap().len(), 1);
        assert_eq!(repository.config_history_len(), history_before);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_movement_and_config() {
        let (repository, service) = setup();
        let first = service.register_movement(inflow(dec!(500))).await.unwrap();
        service.register_movement(outflow(dec!(800))).await.unwrap();
        let movements_before = service.list_movements().unwrap();
        let config_before = service.get_fund().await.unwrap();

        repository.refuse_writes();
        let err = service.delete_movement(first.id).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        assert_eq!(service.list_movements().unwrap(), movements_before);
        assert_eq!(service.get_fund().await.unwrap(), config_before);
    }

    #[tokio::test]
    async fn test_delete_rejected_when_remaining_history_overflows() {
        let (repository, service) = setup();
        let drain = service.register_movement(outflow(dec!(1000))).await.unwrap();
        service.register_movement(inflow(Decimal::MAX)).await.unwrap();
        let movements_before = service.list_movements().unwrap();
        let history_before = repository.config_history_len();

        // Without the drain the inflow alone no longer fits in a Decimal.
        let err = service.delete_movement(drain.id).await.unwrap_err();
        assert!(matches!(err, Error::Fund(FundError::InvalidAmount(_))));
        assert_eq!(service.list_movements().unwrap(), movements_before);
        assert_eq!(repository.config_history_len(), history_before);
    }

    #[tokio::test]
    async fn test_register_movement_rejects_out_of_range_amount() {
        let (repository, service) = setup();
        service.get_fund().await.unwrap();

        let err = service
            .register_movement(inflow(Decimal::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fund(FundError::InvalidAmount(_))));
        assert!(service.list_movements().unwrap().is_empty());
        assert_eq!(repository.config_history_len(), 1);
    }

    #[tokio::test]
    async fn test_reconfigure_reclassifies_gap() {
        let (_repository, service) = setup();

        let config = service.reconfigure(dec!(1200)).await.unwrap();
        assert_eq!(config.target_value, dec!(1200));
        assert_eq!(config.pending_replenishment, dec!(200));
        assert_eq!(service.get_fund().await.unwrap(), config);

        let err = service.reconfigure(dec!(0)).await.unwrap_err();
        assert!(matches!(err, Error::Fund(FundError::InvalidTarget(_))));
        assert_eq!(service.get_fund().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_recalculate_recovers_from_drift() {
        let (repository, service) = setup();
        service.register_movement(outflow(dec!(250))).await.unwrap();
        let expected = service.get_fund().await.unwrap();

        let mut drifted = expected;
        drifted.current_balance = dec!(5);
        drifted.pending_deposit = dec!(17);
        repository.corrupt_config(drifted);

        let snapshot = service.recalculate().await.unwrap();
        assert_eq!(snapshot.config, expected);
        assert_eq!(service.get_fund().await.unwrap(), expected);

        // Running it again changes nothing.
        let again = service.recalculate().await.unwrap();
        assert_eq!(again, snapshot);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_are_serialized() {
        let (_repository, service) = setup();
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.register_movement(outflow(dec!(10))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let config = service.get_fund().await.unwrap();
        assert_eq!(config.current_balance, dec!(800));
        assert_eq!(config.pending_replenishment, dec!(200));
        assert_eq!(service.list_movements().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_period_summary_uses_stored_movements() {
        let (_repository, service) = setup();
        service.register_movement(inflow(dec!(40))).await.unwrap();
        service.register_movement(outflow(dec!(15.50))).await.unwrap();

        let today = Local::now().date_naive();
        let summary = service.period_summary(today, today).unwrap();
        assert_eq!(summary.movement_count, 2);
        assert_eq!(summary.total_inflows, dec!(40));
        assert_eq!(summary.total_outflows, dec!(15.50));

        let long_ago = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let empty = service.period_summary(long_ago, long_ago).unwrap();
        assert_eq!(empty.movement_count, 0);
    }
}
