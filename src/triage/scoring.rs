use super::types::{GridStressLevel, RecommendedAction, RootCauseTag, Signal, SignalStatus, UncertaintyReason};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

// Scoring tunables. Changing any of these shifts every stored case score.
/// Weight of the single worst report (worst status dominates the score).
const MAX_WEIGHT_FACTOR: f64 = 70.0;
/// Weight of the mean status severity across the evidence group.
const MEAN_WEIGHT_FACTOR: f64 = 20.0;
/// Points per distinct reporting channel, capped at `SOURCE_BONUS_CAP` channels.
const SOURCE_BONUS_POINTS: f64 = 3.0;
const SOURCE_BONUS_CAP: usize = 3;
/// Points per report, capped at `VOLUME_BONUS_CAP` reports.
const VOLUME_BONUS_POINTS: f64 = 2.0;
const VOLUME_BONUS_CAP: usize = 5;

pub const DISPATCH_SCORE_THRESHOLD: u8 = 65;

pub const CONFIDENCE_FLOOR: f64 = 0.05;
pub const CONFIDENCE_CEILING: f64 = 0.99;
const CONFIDENCE_BASE: f64 = 0.88;
const SINGLE_REPORT_PENALTY: f64 = 0.24;
const TWO_REPORT_PENALTY: f64 = 0.10;
const DISAGREEMENT_PENALTY: f64 = 0.16;
const CONFLICT_PENALTY: f64 = 0.24;
const AMBIGUOUS_UNKNOWN_PENALTY: f64 = 0.08;
const FLAPPING_PENALTY: f64 = 0.20;
/// Status changes (ascending time order) at which a device counts as flapping.
const FLAPPING_MIN_TRANSITIONS: usize = 2;
const UNANIMOUS_DOWN_BONUS: f64 = 0.07;
const UNANIMOUS_VOLUME_BONUS: f64 = 0.05;
const UNANIMOUS_VOLUME_MIN_REPORTS: usize = 3;
const CORROBORATION_BONUS: f64 = 0.03;

/// Keyword table for root-cause voting. Declaration order is the tie-break order: on an
/// equal hit count the earlier tag keeps the lead.
const ROOT_CAUSE_KEYWORDS: [(RootCauseTag, &[&str]); 3] = [
    (
        RootCauseTag::PaymentTerminal,
        &["payment", "card", "tap", "terminal", "reader"],
    ),
    (
        RootCauseTag::Connector,
        &["connector", "plug", "cable", "port", "bent"],
    ),
    (
        RootCauseTag::Network,
        &["network", "timeout", "offline", "latency", "ping", "modem", "router"],
    ),
];

pub fn status_weight(status: SignalStatus) -> f64 {
    match status {
        SignalStatus::Down => 1.0,
        SignalStatus::Degraded => 0.65,
        SignalStatus::Unknown => 0.4,
        SignalStatus::Online => 0.0,
    }
}

fn distinct_sources(signals: &[Signal]) -> usize {
    signals
        .iter()
        .map(|signal| signal.source)
        .collect::<HashSet<_>>()
        .len()
}

/// 0-100 priority from worst status, mean status, source diversity and report volume.
pub fn compute_priority_score(signals: &[Signal]) -> u8 {
    if signals.is_empty() {
        return 0;
    }

    let weights: Vec<f64> = signals.iter().map(|signal| status_weight(signal.status)).collect();
    let max_weight = weights.iter().copied().fold(f64::MIN, f64::max);
    let mean_weight = weights.iter().sum::<f64>() / weights.len() as f64;

    let max_component = max_weight * MAX_WEIGHT_FACTOR;
    let average_component = mean_weight * MEAN_WEIGHT_FACTOR;
    let source_bonus = distinct_sources(signals).min(SOURCE_BONUS_CAP) as f64 * SOURCE_BONUS_POINTS;
    let volume_bonus = signals.len().min(VOLUME_BONUS_CAP) as f64 * VOLUME_BONUS_POINTS;

    let score = (max_component + average_component + source_bonus + volume_bonus).round_ties_even();
    score.clamp(0.0, 100.0) as u8
}

pub fn compute_sla_hours(priority_score: u8) -> u32 {
    if priority_score >= 85 {
        return 2;
    }
    if priority_score >= 70 {
        return 4;
    }
    if priority_score >= 50 {
        return 8;
    }
    24
}

/// Grid stress is approximated from case severity; there is no live grid feed.
pub fn compute_grid_stress_level(priority_score: u8) -> GridStressLevel {
    if priority_score >= 80 {
        return GridStressLevel::High;
    }
    if priority_score >= 60 {
        return GridStressLevel::Elevated;
    }
    GridStressLevel::Normal
}

/// Keyword vote over the lower-cased evidence text. Hits are raw substring counts, so
/// partial words ("reader" inside "readers") count too.
pub fn infer_root_cause_tag(signals: &[Signal]) -> RootCauseTag {
    let text_blob = signals
        .iter()
        .map(|signal| signal.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut best_tag = RootCauseTag::Unknown;
    let mut best_hits = 0usize;
    for (tag, keywords) in ROOT_CAUSE_KEYWORDS {
        let hits: usize = keywords
            .iter()
            .map(|keyword| text_blob.matches(keyword).count())
            .sum();
        if hits > best_hits {
            best_tag = tag;
            best_hits = hits;
        }
    }

    best_tag
}

fn is_flapping(signals: &[Signal]) -> bool {
    let mut ordered: Vec<&Signal> = signals.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    let transitions = ordered
        .windows(2)
        .filter(|pair| pair[0].status != pair[1].status)
        .count();
    transitions >= FLAPPING_MIN_TRANSITIONS
}

fn dedupe_preserve_order(values: Vec<UncertaintyReason>) -> Vec<UncertaintyReason> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|value| seen.insert(*value)).collect()
}

/// Round to two decimals from the exact binary value, ties to even: 0.865 is stored just
/// below the half-cent and lands on 0.86, while an exact 3.125 lands on 3.12.
pub(crate) fn round_cents(value: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.mantissa() as f64 / 10f64.powi(rounded.scale() as i32)
}

pub(crate) fn clamp_confidence(value: f64) -> f64 {
    value.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

/// Evidence-aware confidence with the uncertainty reasons that lowered it.
///
/// Starts from a fixed base and applies every adjustment that triggers; adjustments are
/// independent and summed before clamping to [0.05, 0.99]. An empty group returns 0.0
/// with `no_evidence`.
pub fn compute_confidence(signals: &[Signal]) -> (f64, Vec<UncertaintyReason>) {
    if signals.is_empty() {
        return (0.0, vec![UncertaintyReason::NoEvidence]);
    }

    let mut confidence = CONFIDENCE_BASE;
    let mut reasons = Vec::new();
    let statuses: HashSet<SignalStatus> = signals.iter().map(|signal| signal.status).collect();

    match signals.len() {
        1 => {
            confidence -= SINGLE_REPORT_PENALTY;
            reasons.push(UncertaintyReason::LowEvidenceVolume);
        }
        2 => {
            confidence -= TWO_REPORT_PENALTY;
            reasons.push(UncertaintyReason::LimitedEvidenceVolume);
        }
        _ => {}
    }

    if statuses.len() > 1 {
        confidence -= DISAGREEMENT_PENALTY;
        reasons.push(UncertaintyReason::CrossSourceDisagreement);
    }

    let has_outage = statuses.contains(&SignalStatus::Down) || statuses.contains(&SignalStatus::Degraded);
    if statuses.contains(&SignalStatus::Online) && has_outage {
        confidence -= CONFLICT_PENALTY;
        reasons.push(UncertaintyReason::StatusConflictRecent);
    }

    if statuses.contains(&SignalStatus::Unknown) && statuses.len() > 1 {
        confidence -= AMBIGUOUS_UNKNOWN_PENALTY;
        reasons.push(UncertaintyReason::AmbiguousUnknownStatus);
    }

    if is_flapping(signals) {
        confidence -= FLAPPING_PENALTY;
        reasons.push(UncertaintyReason::StatusFlapping);
    }

    if signals.iter().all(|signal| signal.status == SignalStatus::Down) {
        confidence += UNANIMOUS_DOWN_BONUS;
    }

    if signals.len() >= UNANIMOUS_VOLUME_MIN_REPORTS && statuses.len() == 1 {
        confidence += UNANIMOUS_VOLUME_BONUS;
    }

    if distinct_sources(signals) >= 2 {
        confidence += CORROBORATION_BONUS;
    }

    (
        round_cents(clamp_confidence(confidence)),
        dedupe_preserve_order(reasons),
    )
}

/// Verification always wins over the score-based choice.
pub fn choose_recommended_action(priority_score: u8, verification_required: bool) -> RecommendedAction {
    if verification_required {
        return RecommendedAction::NeedsVerification;
    }
    if priority_score >= DISPATCH_SCORE_THRESHOLD {
        return RecommendedAction::DispatchFieldTech;
    }
    RecommendedAction::RemoteReset
}
