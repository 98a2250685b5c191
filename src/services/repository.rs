use crate::triage::types::{
    Case, CaseMode, Signal, VerificationOutcome, VerificationResult, VerificationStatus, VerificationTask,
    WorkOrder, WorkOrderState,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Case not found: {0}")]
    CaseNotFound(String),
    #[error("triage store lock poisoned")]
    LockPoisoned,
}

/// Storage seam for triage output. The pipeline never touches it; route handlers and the
/// demo seeder persist through it.
///
/// Case sets are positional overwrites: storing a new baseline or certainty run replaces
/// the previous run for that mode wholesale.
pub trait TriageRepository: Send + Sync {
    fn reset(&self) -> Result<(), RepositoryError>;

    fn set_signals(&self, signals: Vec<Signal>) -> Result<(), RepositoryError>;

    fn signals(&self) -> Result<Vec<Signal>, RepositoryError>;

    fn set_baseline_cases(&self, cases: Vec<Case>) -> Result<(), RepositoryError>;

    fn set_certainty_cases(
        &self,
        cases: Vec<Case>,
        tasks: Vec<VerificationTask>,
    ) -> Result<(), RepositoryError>;

    /// Stored cases for `mode`, highest priority first.
    fn cases(&self, mode: CaseMode) -> Result<Vec<Case>, RepositoryError>;

    /// Looks in the certainty set first, then the baseline set.
    fn find_case(&self, case_id: &str) -> Result<Option<Case>, RepositoryError>;

    fn upsert_work_order(
        &self,
        case_id: &str,
        assigned_team: &str,
        due_at: DateTime<Utc>,
        state: WorkOrderState,
    ) -> Result<WorkOrder, RepositoryError>;

    fn complete_verification(
        &self,
        case_id: &str,
        result: VerificationResult,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<VerificationTask, RepositoryError>;

    fn verification_tasks(&self) -> Result<Vec<VerificationTask>, RepositoryError>;

    fn work_orders(&self) -> Result<Vec<WorkOrder>, RepositoryError>;

    fn verification_outcomes(&self) -> Result<Vec<VerificationOutcome>, RepositoryError>;
}

#[derive(Debug, Default)]
struct StoreState {
    signals: Vec<Signal>,
    baseline_cases: Vec<Case>,
    certainty_cases: Vec<Case>,
    work_orders: BTreeMap<String, WorkOrder>,
    verification_tasks: BTreeMap<String, VerificationTask>,
    verification_outcomes: Vec<VerificationOutcome>,
}

/// Keep first-seen position per case id while letting the later value win, so two
/// charger ids that slug to the same case id collapse into one entry.
fn index_cases(cases: Vec<Case>) -> Vec<Case> {
    let mut indexed: Vec<Case> = Vec::with_capacity(cases.len());
    for case in cases {
        match indexed.iter_mut().find(|existing| existing.id == case.id) {
            Some(existing) => *existing = case,
            None => indexed.push(case),
        }
    }
    indexed
}

fn sorted_by_priority(cases: &[Case]) -> Vec<Case> {
    let mut sorted = cases.to_vec();
    sorted.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    sorted
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<StoreState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, RepositoryError> {
        self.state.read().map_err(|_| RepositoryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, RepositoryError> {
        self.state.write().map_err(|_| RepositoryError::LockPoisoned)
    }
}

impl TriageRepository for InMemoryRepository {
    fn reset(&self) -> Result<(), RepositoryError> {
        *self.write()? = StoreState::default();
        Ok(())
    }

    fn set_signals(&self, signals: Vec<Signal>) -> Result<(), RepositoryError> {
        self.write()?.signals = signals;
        Ok(())
    }

    fn signals(&self) -> Result<Vec<Signal>, RepositoryError> {
        Ok(self.read()?.signals.clone())
    }

    fn set_baseline_cases(&self, cases: Vec<Case>) -> Result<(), RepositoryError> {
        self.write()?.baseline_cases = index_cases(cases);
        Ok(())
    }

    fn set_certainty_cases(
        &self,
        cases: Vec<Case>,
        tasks: Vec<VerificationTask>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        state.certainty_cases = index_cases(cases);
        state.verification_tasks = tasks
            .into_iter()
            .map(|task| (task.case_id.clone(), task))
            .collect();
        Ok(())
    }

    fn cases(&self, mode: CaseMode) -> Result<Vec<Case>, RepositoryError> {
        let state = self.read()?;
        let cases = match mode {
            CaseMode::Baseline => &state.baseline_cases,
            CaseMode::Certainty => &state.certainty_cases,
        };
        Ok(sorted_by_priority(cases))
    }

    fn find_case(&self, case_id: &str) -> Result<Option<Case>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .certainty_cases
            .iter()
            .chain(state.baseline_cases.iter())
            .find(|case| case.id == case_id)
            .cloned())
    }

    fn upsert_work_order(
        &self,
        case_id: &str,
        assigned_team: &str,
        due_at: DateTime<Utc>,
        state: WorkOrderState,
    ) -> Result<WorkOrder, RepositoryError> {
        let mut store = self.write()?;
        let id = match store.work_orders.get(case_id) {
            Some(existing) => existing.id.clone(),
            None => format!("wo_{:03}", store.work_orders.len() + 1),
        };
        let work_order = WorkOrder {
            id,
            case_id: case_id.to_string(),
            assigned_team: assigned_team.to_string(),
            due_at,
            state,
        };
        store
            .work_orders
            .insert(case_id.to_string(), work_order.clone());
        Ok(work_order)
    }

    fn complete_verification(
        &self,
        case_id: &str,
        result: VerificationResult,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<VerificationTask, RepositoryError> {
        let mut store = self.write()?;
        let task = match store.verification_tasks.get(case_id) {
            Some(task) => task.clone(),
            None => {
                let charger_id = store
                    .certainty_cases
                    .iter()
                    .chain(store.baseline_cases.iter())
                    .find(|case| case.id == case_id)
                    .map(|case| case.charger_id.clone())
                    .unwrap_or_else(|| case_id.to_string());
                VerificationTask {
                    id: format!("ver_{:03}", store.verification_tasks.len() + 1),
                    case_id: case_id.to_string(),
                    question: format!("Is charger {charger_id} physically offline?"),
                    owner: crate::triage::explain::VERIFICATION_OWNER.to_string(),
                    status: VerificationStatus::Open,
                    result: None,
                }
            }
        };

        let completed = VerificationTask {
            status: VerificationStatus::Done,
            result: Some(result),
            ..task
        };
        store
            .verification_tasks
            .insert(case_id.to_string(), completed.clone());
        store.verification_outcomes.push(VerificationOutcome {
            case_id: case_id.to_string(),
            result,
            notes,
            recorded_at,
        });
        Ok(completed)
    }

    fn verification_tasks(&self) -> Result<Vec<VerificationTask>, RepositoryError> {
        Ok(self.read()?.verification_tasks.values().cloned().collect())
    }

    fn work_orders(&self) -> Result<Vec<WorkOrder>, RepositoryError> {
        Ok(self.read()?.work_orders.values().cloned().collect())
    }

    fn verification_outcomes(&self) -> Result<Vec<VerificationOutcome>, RepositoryError> {
        Ok(self.read()?.verification_outcomes.clone())
    }
}
