use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::ApiResponse;
use crate::error::AppResult;
use crate::services::metrics::compare_metrics;
use crate::state::AppState;
use crate::triage::types::CompareMetrics;

#[utoipa::path(
    get,
    path = "/api/metrics/compare",
    tag = "metrics",
    responses(
        (status = 200, description = "Baseline vs certainty KPI deltas", body = CompareMetrics)
    )
)]
pub(crate) async fn compare(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CompareMetrics>>> {
    let metrics = compare_metrics(state.repo.as_ref())?;
    Ok(Json(ApiResponse::success(metrics)))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/metrics/compare", get(compare))
}
