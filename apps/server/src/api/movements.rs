use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use fixedfund_core::movements::{Movement, NewMovement};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{DescriptionUpdate, FundView, NewMovementRequest},
};

async fn list_movements(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Movement>>> {
    let mut movements = state.fund_service.list_movements()?;
    movements.reverse();
    Ok(Json(movements))
}

async fn register_movement(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewMovementRequest>,
) -> ApiResult<(StatusCode, Json<Movement>)> {
    let new_movement = NewMovement::try_from(payload)?;
    let movement = state.fund_service.register_movement(new_movement).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

async fn update_description(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DescriptionUpdate>,
) -> ApiResult<Json<FundView>> {
    state
        .fund_service
        .update_description(id, payload.description)
        .await?;
    let config = state.fund_service.get_fund().await?;
    let movements = state.fund_service.list_movements()?;
    Ok(Json(FundView::new(config, movements)))
}

async fn delete_movement(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<FundView>> {
    let snapshot = state.fund_service.delete_movement(id).await?;
    Ok(Json(snapshot.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movements", get(list_movements).post(register_movement))
        .route("/movements/{id}/description", patch(update_description))
        .route("/movements/{id}", delete(delete_movement))
}
