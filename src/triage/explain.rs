use super::types::{RootCauseTag, UncertaintyReason};

pub const VERIFICATION_OWNER: &str = "FieldOps";

pub fn build_baseline_explanation(charger_id: &str, priority_score: u8, root_cause_tag: RootCauseTag) -> String {
    format!(
        "Baseline triage scored charger {charger_id} at {priority_score} from severity-only rules (root cause hint: {}).",
        root_cause_tag.as_str()
    )
}

pub fn build_certainty_explanation(
    charger_id: &str,
    priority_score: u8,
    confidence: f64,
    reasons: &[UncertaintyReason],
) -> String {
    if reasons.is_empty() {
        return format!(
            "Certainty triage scored charger {charger_id} at {priority_score} with confidence {confidence:.2} and no material uncertainty flags."
        );
    }

    let reason_blob = reasons
        .iter()
        .map(|reason| reason.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Certainty triage scored charger {charger_id} at {priority_score} with confidence {confidence:.2}; uncertainty drivers: {reason_blob}."
    )
}

pub fn verification_question(charger_id: &str) -> String {
    format!("Is charger {charger_id} physically offline right now?")
}
