use crate::api::{
    CasesResponseData, DispatchRequest, DispatchResponseData, VerifyRequest, VerifyResponseData,
};
use crate::services::repository::{RepositoryError, TriageRepository};
use crate::triage::types::{Case, CaseMode};
use chrono::{DateTime, Utc};

pub fn list_cases(
    repo: &dyn TriageRepository,
    mode: CaseMode,
) -> Result<CasesResponseData, RepositoryError> {
    Ok(CasesResponseData {
        mode,
        cases: repo.cases(mode)?,
    })
}

fn require_case(repo: &dyn TriageRepository, case_id: &str) -> Result<Case, RepositoryError> {
    repo.find_case(case_id)?
        .ok_or_else(|| RepositoryError::CaseNotFound(case_id.to_string()))
}

pub fn dispatch_case(
    repo: &dyn TriageRepository,
    case_id: &str,
    request: DispatchRequest,
) -> Result<DispatchResponseData, RepositoryError> {
    let case = require_case(repo, case_id)?;
    let work_order =
        repo.upsert_work_order(&case.id, &request.assigned_team, request.due_at, request.state)?;
    tracing::info!(
        case_id = %case.id,
        work_order_id = %work_order.id,
        assigned_team = %work_order.assigned_team,
        "work order dispatched"
    );
    Ok(DispatchResponseData { work_order })
}

pub fn verify_case(
    repo: &dyn TriageRepository,
    case_id: &str,
    request: VerifyRequest,
) -> Result<VerifyResponseData, RepositoryError> {
    verify_case_at(repo, case_id, request, Utc::now())
}

pub(crate) fn verify_case_at(
    repo: &dyn TriageRepository,
    case_id: &str,
    request: VerifyRequest,
    recorded_at: DateTime<Utc>,
) -> Result<VerifyResponseData, RepositoryError> {
    let case = require_case(repo, case_id)?;
    let verification_task =
        repo.complete_verification(&case.id, request.result, request.notes, recorded_at)?;
    tracing::info!(
        case_id = %case.id,
        task_id = %verification_task.id,
        result = ?request.result,
        "verification recorded"
    );
    Ok(VerifyResponseData { verification_task })
}
