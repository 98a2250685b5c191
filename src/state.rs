use crate::config::TriageConfig;
use crate::services::repository::TriageRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: TriageConfig,
    pub repo: Arc<dyn TriageRepository>,
}
