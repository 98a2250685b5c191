use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::{
    ApiResponse, CasesResponseData, DispatchRequest, DispatchResponseData, VerifyRequest,
    VerifyResponseData,
};
use crate::error::{AppError, AppResult};
use crate::routes::triage::parse_body;
use crate::services::cases;
use crate::state::AppState;
use crate::triage::types::CaseMode;

#[derive(Debug, Clone, serde::Deserialize, utoipa::IntoParams)]
pub(crate) struct CasesQuery {
    /// `baseline` or `certainty`
    mode: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/cases",
    tag = "cases",
    params(CasesQuery),
    responses(
        (status = 200, description = "Stored cases, highest priority first", body = CasesResponseData),
        (status = 400, description = "Unsupported mode")
    )
)]
pub(crate) async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<CasesQuery>,
) -> AppResult<Json<ApiResponse<CasesResponseData>>> {
    let mode = query
        .mode
        .as_deref()
        .and_then(CaseMode::parse)
        .ok_or_else(|| AppError::bad_request("mode must be 'baseline' or 'certainty'"))?;
    let data = cases::list_cases(state.repo.as_ref(), mode)?;
    Ok(Json(ApiResponse::success(data)))
}

#[utoipa::path(
    post,
    path = "/api/cases/{id}/dispatch",
    tag = "cases",
    params(("id" = String, Path, description = "Case id")),
    request_body = DispatchRequest,
    responses(
        (status = 200, description = "Created or updated work order", body = DispatchResponseData),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Case not found")
    )
)]
pub(crate) async fn dispatch_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    payload: Result<Json<DispatchRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<DispatchResponseData>>> {
    let request = parse_body(payload)?;
    let data = cases::dispatch_case(state.repo.as_ref(), &case_id, request)?;
    Ok(Json(ApiResponse::success(data)))
}

#[utoipa::path(
    post,
    path = "/api/cases/{id}/verify",
    tag = "cases",
    params(("id" = String, Path, description = "Case id")),
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Completed verification task", body = VerifyResponseData),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Case not found")
    )
)]
pub(crate) async fn verify_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<VerifyResponseData>>> {
    let request = parse_body(payload)?;
    let data = cases::verify_case(state.repo.as_ref(), &case_id, request)?;
    Ok(Json(ApiResponse::success(data)))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/cases", get(list_cases))
        .route("/cases/{id}/dispatch", post(dispatch_case))
        .route("/cases/{id}/verify", post(verify_case))
}
