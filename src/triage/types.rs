use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum SignalSource {
    #[serde(rename = "charger_api")]
    ChargerApi,
    #[serde(rename = "311")]
    ThreeOneOne,
    #[serde(rename = "ugc")]
    Ugc,
}

impl SignalSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChargerApi => "charger_api",
            Self::ThreeOneOne => "311",
            Self::Ugc => "ugc",
        }
    }
}

/// Reported device status. Unrecognized values deserialize to `Unknown`
/// instead of failing, and `offline` is accepted as a synonym for `down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Down,
    Degraded,
    Online,
    Unknown,
}

impl SignalStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "down" | "offline" => Self::Down,
            "degraded" => Self::Degraded,
            "online" => Self::Online,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Degraded => "degraded",
            Self::Online => "online",
            Self::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for SignalStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Signal {
    pub id: String,
    pub source: SignalSource,
    pub timestamp: DateTime<Utc>,
    pub charger_id: String,
    pub lat: f64,
    pub lon: f64,
    pub status: SignalStatus,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RootCauseTag {
    PaymentTerminal,
    Connector,
    Network,
    Unknown,
}

impl RootCauseTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PaymentTerminal => "payment_terminal",
            Self::Connector => "connector",
            Self::Network => "network",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    DispatchFieldTech,
    RemoteReset,
    NeedsVerification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GridStressLevel {
    Normal,
    Elevated,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyReason {
    NoEvidence,
    LowEvidenceVolume,
    LimitedEvidenceVolume,
    CrossSourceDisagreement,
    StatusConflictRecent,
    AmbiguousUnknownStatus,
    StatusFlapping,
}

impl UncertaintyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoEvidence => "no_evidence",
            Self::LowEvidenceVolume => "low_evidence_volume",
            Self::LimitedEvidenceVolume => "limited_evidence_volume",
            Self::CrossSourceDisagreement => "cross_source_disagreement",
            Self::StatusConflictRecent => "status_conflict_recent",
            Self::AmbiguousUnknownStatus => "ambiguous_unknown_status",
            Self::StatusFlapping => "status_flapping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    Baseline,
    Certainty,
}

impl CaseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Certainty => "certainty",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "baseline" => Some(Self::Baseline),
            "certainty" => Some(Self::Certainty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Case {
    pub id: String,
    pub charger_id: String,
    pub priority_score: u8,
    pub sla_hours: u32,
    pub root_cause_tag: RootCauseTag,
    pub confidence: f64,
    pub recommended_action: RecommendedAction,
    pub evidence_ids: Vec<String>,
    pub grid_stress_level: GridStressLevel,
    pub explanation: String,
    #[serde(default)]
    pub uncertainty_reasons: Vec<UncertaintyReason>,
    #[serde(default)]
    pub verification_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Open,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationResult {
    ConfirmedIssue,
    FalseAlarm,
    NeedsMoreData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerificationTask {
    pub id: String,
    pub case_id: String,
    pub question: String,
    pub owner: String,
    #[serde(default)]
    pub status: VerificationStatus,
    #[serde(default)]
    pub result: Option<VerificationResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderState {
    #[default]
    Created,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WorkOrder {
    pub id: String,
    pub case_id: String,
    pub assigned_team: String,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub state: WorkOrderState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerificationOutcome {
    pub case_id: String,
    pub result: VerificationResult,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompareMetrics {
    pub false_dispatch_reduction_pct: f64,
    pub triage_time_reduction_pct: f64,
    pub critical_catch_rate_delta_pct: f64,
}
