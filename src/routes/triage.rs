use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::{ApiResponse, BaselineTriageData, CertaintyTriageData, TriageRequest};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::triage::{run_baseline_triage, run_certainty_triage};

pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/api/triage/baseline",
    tag = "triage",
    request_body = TriageRequest,
    responses(
        (status = 200, description = "Severity-only cases", body = BaselineTriageData),
        (status = 400, description = "Invalid request")
    )
)]
pub(crate) async fn triage_baseline(
    State(state): State<AppState>,
    payload: Result<Json<TriageRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<BaselineTriageData>>> {
    let TriageRequest { signals } = parse_body(payload)?;
    let cases = run_baseline_triage(&signals);

    state.repo.set_signals(signals)?;
    state.repo.set_baseline_cases(cases.clone())?;
    Ok(Json(ApiResponse::success(BaselineTriageData { cases })))
}

#[utoipa::path(
    post,
    path = "/api/triage/certainty",
    tag = "triage",
    request_body = TriageRequest,
    responses(
        (status = 200, description = "Confidence-aware cases and verification tasks", body = CertaintyTriageData),
        (status = 400, description = "Invalid request")
    )
)]
pub(crate) async fn triage_certainty(
    State(state): State<AppState>,
    payload: Result<Json<TriageRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<CertaintyTriageData>>> {
    let TriageRequest { signals } = parse_body(payload)?;
    let (cases, verification_tasks) =
        run_certainty_triage(&signals, state.config.confidence_threshold);

    state.repo.set_signals(signals)?;
    state
        .repo
        .set_certainty_cases(cases.clone(), verification_tasks.clone())?;
    Ok(Json(ApiResponse::success(CertaintyTriageData {
        cases,
        verification_tasks,
    })))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/triage/baseline", post(triage_baseline))
        .route("/triage/certainty", post(triage_certainty))
}
