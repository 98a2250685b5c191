//! Wire envelope and request/response bodies for the HTTP surface.

use crate::triage::types::{
    Case, CaseMode, Signal, VerificationResult, VerificationTask, WorkOrder, WorkOrderState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every `/api` response is wrapped as `{ ok, data, error }`; `data` and `error` are
/// always present, one of them null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TriageRequest {
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BaselineTriageData {
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CertaintyTriageData {
    pub cases: Vec<Case>,
    #[serde(default)]
    pub verification_tasks: Vec<VerificationTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CasesResponseData {
    pub mode: CaseMode,
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispatchRequest {
    pub assigned_team: String,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub state: WorkOrderState,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispatchResponseData {
    pub work_order: WorkOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub result: VerificationResult,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponseData {
    pub verification_task: VerificationTask,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_always_carries_all_keys() {
        let payload = serde_json::to_value(ApiResponse::success(serde_json::json!({"x": 1}))).unwrap();
        let keys: Vec<&str> = payload
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"ok") && keys.contains(&"data") && keys.contains(&"error"));
        assert!(payload["error"].is_null());

        let payload = serde_json::to_value(ApiResponse::<()>::failure("boom")).unwrap();
        assert_eq!(payload["ok"], false);
        assert!(payload["data"].is_null());
    }

    #[test]
    fn dispatch_request_defaults_to_created() {
        let request: DispatchRequest = serde_json::from_value(serde_json::json!({
            "assigned_team": "FieldOps North",
            "due_at": "2026-02-21T02:00:00Z"
        }))
        .unwrap();
        assert_eq!(request.state, WorkOrderState::Created);
    }

    #[test]
    fn verify_request_rejects_unknown_result() {
        let parsed = serde_json::from_value::<VerifyRequest>(serde_json::json!({"result": "maybe"}));
        assert!(parsed.is_err());

        let request: VerifyRequest =
            serde_json::from_value(serde_json::json!({"result": "false_alarm"})).unwrap();
        assert_eq!(request.result, VerificationResult::FalseAlarm);
        assert!(request.notes.is_none());
    }
}
