use super::explain::build_certainty_explanation;
use super::scoring::compute_confidence;
use super::types::{Case, CaseMode, Signal, VerificationTask};
use super::{run_triage, Assessment, CaseFacts, TriageStrategy};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.65;

/// Evidence-aware triage: cases whose confidence falls below `threshold` are held for
/// human verification instead of a dispatch or reset.
#[derive(Debug, Clone, Copy)]
pub struct CertaintyStrategy {
    pub threshold: f64,
}

impl CertaintyStrategy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for CertaintyStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl TriageStrategy for CertaintyStrategy {
    fn mode(&self) -> CaseMode {
        CaseMode::Certainty
    }

    fn assess(&self, signals: &[Signal], _priority_score: u8) -> Assessment {
        let (confidence, uncertainty_reasons) = compute_confidence(signals);
        Assessment {
            confidence,
            uncertainty_reasons,
            verification_required: confidence < self.threshold,
        }
    }

    fn explain(&self, facts: CaseFacts<'_>) -> String {
        build_certainty_explanation(
            facts.charger_id,
            facts.priority_score,
            facts.assessment.confidence,
            &facts.assessment.uncertainty_reasons,
        )
    }
}

pub fn run_certainty_triage(
    signals: &[Signal],
    confidence_threshold: f64,
) -> (Vec<Case>, Vec<VerificationTask>) {
    let outcome = run_triage(&CertaintyStrategy::new(confidence_threshold), signals);
    (outcome.cases, outcome.verification_tasks)
}
