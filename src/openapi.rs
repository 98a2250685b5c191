use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::api::{
    BaselineTriageData, CasesResponseData, CertaintyTriageData, DispatchRequest,
    DispatchResponseData, TriageRequest, VerifyRequest, VerifyResponseData,
};
use crate::routes::health::HealthResponse;
use crate::services::demo_seed::DemoSeedSummary;
use crate::state::AppState;
use crate::triage::types::{
    Case, CaseMode, CompareMetrics, GridStressLevel, RecommendedAction, RootCauseTag, Signal,
    SignalSource, SignalStatus, UncertaintyReason, VerificationOutcome, VerificationResult,
    VerificationStatus, VerificationTask, WorkOrder, WorkOrderState,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GridOps Triage API",
        description = "Outage-signal triage for public EV chargers. Every /api response is wrapped as { ok, data, error }."
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::triage::triage_baseline,
        crate::routes::triage::triage_certainty,
        crate::routes::cases::list_cases,
        crate::routes::cases::dispatch_case,
        crate::routes::cases::verify_case,
        crate::routes::metrics::compare,
        crate::routes::demo::reset_demo_state,
    ),
    components(schemas(
        HealthResponse,
        Signal,
        SignalSource,
        SignalStatus,
        Case,
        CaseMode,
        RootCauseTag,
        RecommendedAction,
        GridStressLevel,
        UncertaintyReason,
        VerificationTask,
        VerificationStatus,
        VerificationResult,
        VerificationOutcome,
        WorkOrder,
        WorkOrderState,
        CompareMetrics,
        TriageRequest,
        BaselineTriageData,
        CertaintyTriageData,
        CasesResponseData,
        DispatchRequest,
        DispatchResponseData,
        VerifyRequest,
        VerifyResponseData,
        DemoSeedSummary,
    )),
    tags(
        (name = "health"),
        (name = "triage", description = "Run baseline or certainty triage over a signal batch"),
        (name = "cases", description = "Stored cases, dispatch and field verification"),
        (name = "metrics", description = "Baseline vs certainty comparison"),
        (name = "demo", description = "Deterministic demo dataset")
    )
)]
pub struct ApiDoc;

pub fn openapi_json() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}
