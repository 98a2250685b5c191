use crate::config::TriageConfig;
use crate::services::repository::{RepositoryError, TriageRepository};
use crate::triage::types::{CaseMode, Signal, VerificationResult};
use crate::triage::{run_baseline_triage, run_certainty_triage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SEED_SIGNALS_JSON: &str = include_str!("../../seed/signals.json");
const SEED_OUTCOMES_JSON: &str = include_str!("../../seed/verification_outcomes.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DemoSeedSummary {
    pub signals: usize,
    pub baseline_cases: usize,
    pub certainty_cases: usize,
    pub verification_tasks: usize,
    pub verification_outcomes: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct SeedOutcomeRow {
    case_id: String,
    result: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    recorded_at: Option<DateTime<Utc>>,
}

fn parse_seed<T: serde::de::DeserializeOwned>(name: &str, raw: &str) -> Result<T, SeedError> {
    serde_json::from_str(raw).map_err(|source| SeedError::Parse {
        name: name.to_string(),
        source,
    })
}

fn read_signals_file(path: &Path) -> Result<Vec<Signal>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed(&path.display().to_string(), &raw)
}

fn seed_signals(config: &TriageConfig) -> Result<Vec<Signal>, SeedError> {
    match config.seed_signals_path.as_deref() {
        Some(path) => read_signals_file(path),
        None => parse_seed("seed/signals.json", SEED_SIGNALS_JSON),
    }
}

fn parse_result(value: &str) -> Option<VerificationResult> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

/// Replays recorded field outcomes. Rows with an unsupported result or a case the seed
/// run did not produce are skipped. Rows without a timestamp use the newest signal time
/// so reseeding never depends on the clock.
fn apply_verification_outcomes(
    repo: &dyn TriageRepository,
    fallback_time: DateTime<Utc>,
) -> Result<usize, SeedError> {
    let rows: Vec<SeedOutcomeRow> =
        parse_seed("seed/verification_outcomes.json", SEED_OUTCOMES_JSON)?;
    let mut applied = 0;
    for row in rows {
        let Some(result) = parse_result(&row.result) else {
            tracing::debug!(case_id = %row.case_id, result = %row.result, "skipping seed outcome with unsupported result");
            continue;
        };
        // Outcomes only attach to cases this seed produced; an orphan row has no task to close.
        if repo.find_case(&row.case_id)?.is_none() {
            tracing::debug!(case_id = %row.case_id, "skipping seed outcome for unknown case");
            continue;
        }
        repo.complete_verification(
            &row.case_id,
            result,
            row.notes,
            row.recorded_at.unwrap_or(fallback_time),
        )?;
        applied += 1;
    }
    Ok(applied)
}

/// Reset the repository and load the deterministic demo dataset through both pipelines.
pub fn load_demo_seed(
    repo: &dyn TriageRepository,
    config: &TriageConfig,
) -> Result<DemoSeedSummary, SeedError> {
    let signals = seed_signals(config)?;
    let fallback_time = signals
        .iter()
        .map(|signal| signal.timestamp)
        .max()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    repo.reset()?;
    repo.set_signals(signals.clone())?;

    let baseline_cases = run_baseline_triage(&signals);
    let (certainty_cases, verification_tasks) =
        run_certainty_triage(&signals, config.confidence_threshold);

    let mut summary = DemoSeedSummary {
        signals: signals.len(),
        baseline_cases: baseline_cases.len(),
        certainty_cases: certainty_cases.len(),
        verification_tasks: verification_tasks.len(),
        verification_outcomes: 0,
    };

    repo.set_baseline_cases(baseline_cases)?;
    repo.set_certainty_cases(certainty_cases, verification_tasks)?;
    summary.verification_outcomes = apply_verification_outcomes(repo, fallback_time)?;

    tracing::info!(
        signals = summary.signals,
        baseline_cases = summary.baseline_cases,
        certainty_cases = summary.certainty_cases,
        verification_tasks = summary.verification_tasks,
        verification_outcomes = summary.verification_outcomes,
        "demo seed loaded"
    );
    Ok(summary)
}

/// Seed only when either mode holds fewer than `demo_min_cases` cases.
pub fn ensure_demo_cases(
    repo: &dyn TriageRepository,
    config: &TriageConfig,
) -> Result<Option<DemoSeedSummary>, SeedError> {
    let baseline = repo.cases(CaseMode::Baseline)?.len();
    let certainty = repo.cases(CaseMode::Certainty)?.len();
    if baseline >= config.demo_min_cases && certainty >= config.demo_min_cases {
        return Ok(None);
    }
    load_demo_seed(repo, config).map(Some)
}
