use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use fixedfund_core::fund::FundConfig;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{FundView, TargetUpdate},
};

async fn get_fund(State(state): State<Arc<AppState>>) -> ApiResult<Json<FundView>> {
    let config = state.fund_service.get_fund().await?;
    let movements = state.fund_service.list_movements()?;
    Ok(Json(FundView::new(config, movements)))
}

async fn update_target(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TargetUpdate>,
) -> ApiResult<Json<FundConfig>> {
    let target = payload.resolve()?;
    let config = state.fund_service.reconfigure(target).await?;
    Ok(Json(config))
}

async fn recalculate(State(state): State<Arc<AppState>>) -> ApiResult<Json<FundView>> {
    let snapshot = state.fund_service.recalculate().await?;
    Ok(Json(snapshot.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fund", get(get_fund))
        .route("/fund/target", put(update_target))
        .route("/fund/recalculate", post(recalculate))
}
