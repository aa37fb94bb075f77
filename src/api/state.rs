// src/api/state.rs
use crate::config::PollerConfig;
use crate::poller::ResultsPoller;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PollerConfig>,
    pub poller: Arc<ResultsPoller>,
}

impl AppState {
    pub fn new(config: PollerConfig, poller: ResultsPoller) -> Self {
        Self {
            config: Arc::new(config),
            poller: Arc::new(poller),
        }
    }
}
