use std::sync::Arc;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one model client, built at startup and shared by every flow.
    pub llm: Arc<dyn CompletionModel>,
    pub dashboard: Arc<Dashboard>,
    pub config: Config,
}
