use crate::services::repository::{RepositoryError, TriageRepository};
use crate::triage::types::{Case, CaseMode, CompareMetrics, RecommendedAction, VerificationResult};
use crate::triage::scoring::round_cents;
use std::collections::HashMap;

/// Minutes an analyst spends per baseline case.
const BASELINE_MINUTES_PER_CASE: f64 = 6.0;
/// Certainty cases arrive pre-ranked with reasons attached.
const CERTAINTY_MINUTES_PER_CASE: f64 = 4.0;
const MINUTES_PER_VERIFICATION_TASK: f64 = 2.0;
const CRITICAL_PRIORITY_SCORE: u8 = 80;

pub(crate) fn pct_reduction(baseline: f64, certainty: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    (baseline - certainty) / baseline * 100.0
}

fn is_dispatch(case: &Case) -> bool {
    case.recommended_action == RecommendedAction::DispatchFieldTech
}

fn catch_rate(caught: usize, critical: usize) -> f64 {
    if critical == 0 {
        0.0
    } else {
        caught as f64 / critical as f64
    }
}

pub fn compare_metrics(repo: &dyn TriageRepository) -> Result<CompareMetrics, RepositoryError> {
    let baseline = repo.cases(CaseMode::Baseline)?;
    let certainty = repo.cases(CaseMode::Certainty)?;
    let task_count = repo.verification_tasks()?.len();

    let baseline_dispatches = baseline.iter().filter(|case| is_dispatch(case)).count();
    let certainty_dispatches = certainty.iter().filter(|case| is_dispatch(case)).count();
    let false_dispatch_reduction_pct =
        pct_reduction(baseline_dispatches as f64, certainty_dispatches as f64);

    let baseline_minutes = baseline.len() as f64 * BASELINE_MINUTES_PER_CASE;
    let certainty_minutes = certainty.len() as f64 * CERTAINTY_MINUTES_PER_CASE
        + task_count as f64 * MINUTES_PER_VERIFICATION_TASK;
    let triage_time_reduction_pct = pct_reduction(baseline_minutes, certainty_minutes);

    // Latest outcome per case wins.
    let latest_outcome: HashMap<String, VerificationResult> = repo
        .verification_outcomes()?
        .into_iter()
        .map(|outcome| (outcome.case_id, outcome.result))
        .collect();

    let baseline_critical: Vec<&Case> = baseline
        .iter()
        .filter(|case| case.priority_score >= CRITICAL_PRIORITY_SCORE)
        .collect();
    let certainty_critical: Vec<&Case> = certainty
        .iter()
        .filter(|case| case.priority_score >= CRITICAL_PRIORITY_SCORE)
        .collect();

    let baseline_caught = baseline_critical.iter().filter(|case| is_dispatch(case)).count();
    let certainty_caught = certainty_critical
        .iter()
        .filter(|case| {
            is_dispatch(case)
                || latest_outcome.get(&case.id) == Some(&VerificationResult::ConfirmedIssue)
        })
        .count();

    let critical_catch_rate_delta_pct = (catch_rate(certainty_caught, certainty_critical.len())
        - catch_rate(baseline_caught, baseline_critical.len()))
        * 100.0;

    let metrics = CompareMetrics {
        false_dispatch_reduction_pct: round_cents(false_dispatch_reduction_pct),
        triage_time_reduction_pct: round_cents(triage_time_reduction_pct),
        critical_catch_rate_delta_pct: round_cents(critical_catch_rate_delta_pct),
    };
    tracing::debug!(
        baseline_cases = baseline.len(),
        certainty_cases = certainty.len(),
        verification_tasks = task_count,
        "computed comparison metrics"
    );
    Ok(metrics)
}
