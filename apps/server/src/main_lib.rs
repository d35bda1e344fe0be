use std::sync::Arc;

use crate::config::Config;
use fixedfund_core::fund::{FundService, FundServiceTrait};
use fixedfund_storage_sqlite::{db, LedgerRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub fund_service: Arc<dyn FundServiceTrait + Send + Sync>,
}

/// Installs the global subscriber. `FF_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let log_format = std::env::var("FF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let ledger_repository = Arc::new(LedgerRepository::new(pool.clone(), writer));
    let fund_service = Arc::new(FundService::new(ledger_repository));

    // Creates the default config on a fresh database.
    let fund = fund_service.get_fund().await?;
    tracing::info!(
        "Fund ready: target {}, balance {}",
        fund.target_value,
        fund.current_balance
    );

    Ok(Arc::new(AppState { fund_service }))
}
