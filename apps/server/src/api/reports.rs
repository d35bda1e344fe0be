use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use fixedfund_core::reports::parse_period_date;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::PeriodQuery,
};

async fn period_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Response> {
    let from = parse_period_date(&query.from)?;
    let to = parse_period_date(&query.to)?;
    let summary = state.fund_service.period_summary(from, to)?;

    match query.format.as_deref().unwrap_or("json") {
        "json" => Ok(Json(summary).into_response()),
        "text" => Ok(summary.render_text().into_response()),
        other => Err(ApiError::BadRequest(format!(
            "Unknown report format '{}', expected json or text",
            other
        ))),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/reports/period", get(period_summary))
}
