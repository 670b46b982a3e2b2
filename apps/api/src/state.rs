use std::sync::Arc;

use crate::analyses::store::AnalysisStore;
use crate::config::Config;
use crate::ingest::jd_fetch::JobFetcher;
use crate::matching::taxonomy::SkillTaxonomy;
use crate::matching::weights::ScoringWeights;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup; read-only afterwards.
    pub taxonomy: Arc<SkillTaxonomy>,
    pub weights: Arc<ScoringWeights>,
    /// Pluggable job-description fetcher. Default: HttpJobFetcher.
    pub fetcher: Arc<dyn JobFetcher>,
    pub analyses: AnalysisStore,
}
