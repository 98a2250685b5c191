use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::state::AppState;
use crate::triage::types::{CaseMode, VerificationStatus};

/// Liveness plus a snapshot of what the store currently holds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub signals: usize,
    pub baseline_cases: usize,
    pub certainty_cases: usize,
    pub open_verification_tasks: usize,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 500, description = "Store unavailable")
    )
)]
pub(crate) async fn healthz_handler(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let open_verification_tasks = state
        .repo
        .verification_tasks()?
        .iter()
        .filter(|task| task.status == VerificationStatus::Open)
        .count();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        signals: state.repo.signals()?.len(),
        baseline_cases: state.repo.cases(CaseMode::Baseline)?.len(),
        certainty_cases: state.repo.cases(CaseMode::Certainty)?.len(),
        open_verification_tasks,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz_handler))
}
