use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::ApiResponse;
use crate::error::AppResult;
use crate::services::demo_seed::{load_demo_seed, DemoSeedSummary};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/demo/reset",
    tag = "demo",
    responses(
        (status = 200, description = "Demo dataset reloaded", body = DemoSeedSummary),
        (status = 500, description = "Demo reset failed")
    )
)]
pub(crate) async fn reset_demo_state(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DemoSeedSummary>>> {
    let summary = load_demo_seed(state.repo.as_ref(), &state.config)?;
    Ok(Json(ApiResponse::success(summary)))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/demo/reset", post(reset_demo_state))
}
