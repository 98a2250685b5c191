use crate::config::TriageConfig;
use crate::services::repository::InMemoryRepository;
use crate::state::AppState;
use crate::triage::types::{Signal, SignalSource, SignalStatus};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

pub fn base_ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 20, 20, 0, 0).unwrap()
}

pub fn signal(
    id: &str,
    charger_id: &str,
    status: SignalStatus,
    source: SignalSource,
    minutes: i64,
    text: &str,
) -> Signal {
    Signal {
        id: id.to_string(),
        source,
        timestamp: base_ts() + Duration::minutes(minutes),
        charger_id: charger_id.to_string(),
        lat: 30.2672,
        lon: -97.7431,
        status,
        text: text.to_string(),
    }
}

pub fn test_config() -> TriageConfig {
    TriageConfig {
        confidence_threshold: 0.65,
        seed_signals_path: None,
        demo_min_cases: 6,
        seed_on_start: false,
        cors_origins: Vec::new(),
    }
}

pub fn test_state() -> AppState {
    AppState {
        config: test_config(),
        repo: Arc::new(InMemoryRepository::new()),
    }
}
