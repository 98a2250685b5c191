//! Deterministic triage of outage signals into prioritized cases.
//!
//! Both modes share one driver: signals are grouped per charger, each group is scored
//! independently, and the strategy decides confidence, verification, and wording. Nothing
//! in this module performs I/O or reads the clock.

mod baseline;
mod certainty;
pub mod explain;
pub mod grouping;
pub mod ids;
pub mod scoring;
pub mod types;


pub use baseline::{run_baseline_triage, BaselineStrategy};
pub use certainty::{run_certainty_triage, CertaintyStrategy, DEFAULT_CONFIDENCE_THRESHOLD};

use self::types::{Case, CaseMode, RootCauseTag, Signal, UncertaintyReason, VerificationStatus, VerificationTask};

/// Confidence verdict a strategy returns for one charger's evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub confidence: f64,
    pub uncertainty_reasons: Vec<UncertaintyReason>,
    pub verification_required: bool,
}

/// Scored inputs handed to a strategy when it writes the case explanation.
#[derive(Debug, Clone, Copy)]
pub struct CaseFacts<'a> {
    pub charger_id: &'a str,
    pub priority_score: u8,
    pub root_cause_tag: RootCauseTag,
    pub assessment: &'a Assessment,
}

pub trait TriageStrategy {
    fn mode(&self) -> CaseMode;

    fn assess(&self, signals: &[Signal], priority_score: u8) -> Assessment;

    fn explain(&self, facts: CaseFacts<'_>) -> String;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriageOutcome {
    pub cases: Vec<Case>,
    pub verification_tasks: Vec<VerificationTask>,
}

/// Run one strategy over a signal batch.
///
/// Cases come back sorted by descending priority (stable over charger-id order);
/// verification tasks are sorted by case id.
pub fn run_triage<S: TriageStrategy + ?Sized>(strategy: &S, signals: &[Signal]) -> TriageOutcome {
    let grouped = grouping::group_signals_by_charger(signals);
    let mut outcome = TriageOutcome::default();

    for (charger_id, charger_signals) in &grouped {
        let priority_score = scoring::compute_priority_score(charger_signals);
        let root_cause_tag = scoring::infer_root_cause_tag(charger_signals);
        let assessment = strategy.assess(charger_signals, priority_score);
        let case_id = ids::make_case_id(charger_id);

        let explanation = strategy.explain(CaseFacts {
            charger_id,
            priority_score,
            root_cause_tag,
            assessment: &assessment,
        });

        tracing::debug!(
            mode = strategy.mode().as_str(),
            charger_id = %charger_id,
            priority_score,
            confidence = assessment.confidence,
            verification_required = assessment.verification_required,
            evidence = charger_signals.len(),
            "scored charger"
        );

        if assessment.verification_required {
            outcome.verification_tasks.push(VerificationTask {
                id: ids::make_verification_task_id(&case_id),
                case_id: case_id.clone(),
                question: explain::verification_question(charger_id),
                owner: explain::VERIFICATION_OWNER.to_string(),
                status: VerificationStatus::Open,
                result: None,
            });
        }

        outcome.cases.push(Case {
            id: case_id,
            charger_id: charger_id.clone(),
            priority_score,
            sla_hours: scoring::compute_sla_hours(priority_score),
            root_cause_tag,
            confidence: assessment.confidence,
            recommended_action: scoring::choose_recommended_action(
                priority_score,
                assessment.verification_required,
            ),
            evidence_ids: charger_signals.iter().map(|signal| signal.id.clone()).collect(),
            grid_stress_level: scoring::compute_grid_stress_level(priority_score),
            explanation,
            uncertainty_reasons: assessment.uncertainty_reasons,
            verification_required: assessment.verification_required,
        });
    }

    outcome
        .cases
        .sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    outcome
        .verification_tasks
        .sort_by(|a, b| a.case_id.cmp(&b.case_id));

    tracing::debug!(
        mode = strategy.mode().as_str(),
        signals = signals.len(),
        cases = outcome.cases.len(),
        verification_tasks = outcome.verification_tasks.len(),
        "triage run complete"
    );

    outcome
}
