use super::explain::build_baseline_explanation;
use super::scoring::{clamp_confidence, round_cents};
use super::types::{Case, CaseMode, Signal};
use super::{run_triage, Assessment, CaseFacts, TriageStrategy};

const BASELINE_CONFIDENCE_OFFSET: f64 = 0.55;
const BASELINE_CONFIDENCE_DIVISOR: f64 = 200.0;

/// Severity-only triage: confidence is a proxy of the score and nothing is sent to
/// verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineStrategy;

pub(crate) fn baseline_confidence(priority_score: u8) -> f64 {
    let confidence =
        BASELINE_CONFIDENCE_OFFSET + f64::from(priority_score) / BASELINE_CONFIDENCE_DIVISOR;
    round_cents(clamp_confidence(confidence))
}

impl TriageStrategy for BaselineStrategy {
    fn mode(&self) -> CaseMode {
        CaseMode::Baseline
    }

    fn assess(&self, _signals: &[Signal], priority_score: u8) -> Assessment {
        Assessment {
            confidence: baseline_confidence(priority_score),
            uncertainty_reasons: Vec::new(),
            verification_required: false,
        }
    }

    fn explain(&self, facts: CaseFacts<'_>) -> String {
        build_baseline_explanation(facts.charger_id, facts.priority_score, facts.root_cause_tag)
    }
}

pub fn run_baseline_triage(signals: &[Signal]) -> Vec<Case> {
    run_triage(&BaselineStrategy, signals).cases
}
