pub mod cases;
pub mod demo;
pub mod health;
pub mod metrics;
pub mod triage;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(triage::router())
                .merge(cases::router())
                .merge(metrics::router())
                .merge(demo::router())
                .merge(crate::openapi::router()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, payload)
    }

    fn signals() -> Value {
        json!({
            "signals": [
                {"id": "sig_10", "source": "charger_api", "timestamp": "2026-02-20T20:00:00Z", "charger_id": "AUS_3003", "lat": 30.2672, "lon": -97.7431, "status": "down", "text": "offline timeout"},
                {"id": "sig_11", "source": "311", "timestamp": "2026-02-20T20:01:00Z", "charger_id": "AUS_3003", "lat": 30.2672, "lon": -97.7431, "status": "online", "text": "came back online"},
                {"id": "sig_12", "source": "ugc", "timestamp": "2026-02-20T20:02:00Z", "charger_id": "AUS_3003", "lat": 30.2672, "lon": -97.7431, "status": "down", "text": "offline again"},
                {"id": "sig_20", "source": "charger_api", "timestamp": "2026-02-20T20:00:00Z", "charger_id": "AUS_4004", "lat": 30.2849, "lon": -97.7341, "status": "down", "text": "connector bent"},
                {"id": "sig_21", "source": "311", "timestamp": "2026-02-20T20:03:00Z", "charger_id": "AUS_4004", "lat": 30.2849, "lon": -97.7341, "status": "down", "text": "plug damaged"},
                {"id": "sig_22", "source": "ugc", "timestamp": "2026-02-20T20:05:00Z", "charger_id": "AUS_4004", "lat": 30.2849, "lon": -97.7341, "status": "down", "text": "cable issue persists"}
            ]
        })
    }

    #[tokio::test]
    async fn healthz_is_unwrapped() {
        let state = crate::test_support::test_state();
        let (status, payload) = call(router(state.clone()), "GET", "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload,
            json!({
                "status": "ok",
                "signals": 0,
                "baseline_cases": 0,
                "certainty_cases": 0,
                "open_verification_tasks": 0
            })
        );
    }

    #[tokio::test]
    async fn healthz_reports_store_contents() {
        let state = crate::test_support::test_state();
        call(router(state.clone()), "POST", "/api/triage/certainty", Some(signals())).await;
        let (_, payload) = call(router(state.clone()), "GET", "/healthz", None).await;
        assert_eq!(payload["signals"], 6);
        assert_eq!(payload["baseline_cases"], 0);
        assert_eq!(payload["certainty_cases"], 2);
        assert_eq!(payload["open_verification_tasks"], 1);

        call(
            router(state.clone()),
            "POST",
            "/api/cases/case_aus_3003/verify",
            Some(json!({"result": "false_alarm"})),
        )
        .await;
        let (_, payload) = call(router(state), "GET", "/healthz", None).await;
        assert_eq!(payload["open_verification_tasks"], 0);
    }

    #[tokio::test]
    async fn certainty_triage_returns_cases_and_tasks() {
        let state = crate::test_support::test_state();
        let (status, payload) =
            call(router(state.clone()), "POST", "/api/triage/certainty", Some(signals())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["ok"], true);
        assert!(payload["error"].is_null());
        let cases = payload["data"]["cases"].as_array().unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0]["id"], "case_aus_4004");
        assert_eq!(cases[0]["verification_required"], false);
        assert_eq!(cases[1]["recommended_action"], "needs_verification");
        let tasks = payload["data"]["verification_tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["id"], "ver_aus_3003");
        assert_eq!(tasks[0]["status"], "open");

        let (status, payload) =
            call(router(state), "GET", "/api/cases?mode=certainty", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["mode"], "certainty");
        assert_eq!(payload["data"]["cases"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn baseline_triage_stores_cases() {
        let state = crate::test_support::test_state();
        let (status, payload) =
            call(router(state.clone()), "POST", "/api/triage/baseline", Some(signals())).await;
        assert_eq!(status, StatusCode::OK);
        let cases = payload["data"]["cases"].as_array().unwrap();
        assert!(cases.iter().all(|case| case["uncertainty_reasons"] == json!([])));

        let (_, payload) = call(router(state.clone()), "GET", "/api/cases?mode=baseline", None).await;
        assert_eq!(payload["data"]["cases"].as_array().unwrap().len(), 2);
        assert_eq!(state.repo.signals().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn malformed_triage_body_is_bad_request() {
        let app = router(crate::test_support::test_state());
        let (status, payload) = call(
            app,
            "POST",
            "/api/triage/baseline",
            Some(json!({"signals": [{"id": "x"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["ok"], false);
        assert!(payload["data"].is_null());
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn unsupported_mode_is_rejected() {
        let state = crate::test_support::test_state();
        for uri in ["/api/cases?mode=everything", "/api/cases"] {
            let (status, payload) = call(router(state.clone()), "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(payload["error"], "mode must be 'baseline' or 'certainty'");
        }
    }

    #[tokio::test]
    async fn dispatch_and_verify_flow() {
        let state = crate::test_support::test_state();
        call(router(state.clone()), "POST", "/api/triage/certainty", Some(signals())).await;

        let (status, payload) = call(
            router(state.clone()),
            "POST",
            "/api/cases/case_aus_4004/dispatch",
            Some(json!({"assigned_team": "FieldOps North", "due_at": "2026-02-21T02:00:00Z"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["work_order"]["id"], "wo_001");
        assert_eq!(payload["data"]["work_order"]["state"], "created");

        let (status, payload) = call(
            router(state.clone()),
            "POST",
            "/api/cases/case_aus_3003/verify",
            Some(json!({"result": "confirmed_issue", "notes": "Cable cut."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let task = &payload["data"]["verification_task"];
        assert_eq!(task["id"], "ver_aus_3003");
        assert_eq!(task["status"], "done");
        assert_eq!(task["result"], "confirmed_issue");
        assert_eq!(state.repo.verification_outcomes().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn case_actions_report_missing_cases_and_bad_bodies() {
        let state = crate::test_support::test_state();
        let (status, payload) = call(
            router(state.clone()),
            "POST",
            "/api/cases/case_missing/dispatch",
            Some(json!({"assigned_team": "FieldOps", "due_at": "2026-02-21T02:00:00Z"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"], "Case not found: case_missing");

        let (status, _) = call(
            router(state.clone()),
            "POST",
            "/api/cases/case_missing/verify",
            Some(json!({"result": "false_alarm"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, payload) = call(
            router(state),
            "POST",
            "/api/cases/case_missing/verify",
            Some(json!({"result": "definitely"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["ok"], false);
    }

    #[tokio::test]
    async fn demo_reset_then_metrics() {
        let state = crate::test_support::test_state();
        let (status, payload) = call(router(state.clone()), "POST", "/api/demo/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["signals"], 24);
        assert_eq!(payload["data"]["verification_outcomes"], 3);

        let (status, payload) = call(router(state), "GET", "/api/metrics/compare", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload["data"],
            json!({
                "false_dispatch_reduction_pct": 28.57,
                "triage_time_reduction_pct": 18.52,
                "critical_catch_rate_delta_pct": -20.0
            })
        );
    }

    #[tokio::test]
    async fn demo_reset_failure_uses_envelope() {
        let mut state = crate::test_support::test_state();
        state.config.seed_signals_path = Some("/nonexistent/signals.json".into());
        let (status, payload) = call(router(state), "POST", "/api/demo/reset", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload["ok"], false);
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .starts_with("demo reset failed:"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = router(crate::test_support::test_state());
        let (status, payload) = call(app, "GET", "/api/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(payload["paths"]["/api/metrics/compare"].is_object());
    }
}
