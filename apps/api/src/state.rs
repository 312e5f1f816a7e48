use std::sync::Arc;

use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::matching::JobMatcher;
use crate::repository::ResumeRepository;
use crate::storage::StorageGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ResumeRepository>,
    pub storage: Arc<StorageGateway>,
    /// Tier chain built once at startup; the LLM tier is present only when configured.
    pub engine: Arc<AnalysisEngine>,
    pub matcher: Arc<JobMatcher>,
    pub config: Config,
}
