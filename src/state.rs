use std::sync::Arc;

use crate::config::Config;
use crate::repository::ExamRepository;
use axum::extract::FromRef;

/// Shared handle to whichever store the service runs on.
pub type Repo = Arc<dyn ExamRepository>;

#[derive(Clone)]
pub struct AppState {
    pub repo: Repo,
    pub config: Config,
}

impl FromRef<AppState> for Repo {
    fn from_ref(state: &AppState) -> Self {
        state.repo.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
