mod analyses;
mod config;
mod errors;
mod ingest;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analyses::store::AnalysisStore;
use crate::config::Config;
use crate::ingest::jd_fetch::HttpJobFetcher;
use crate::matching::taxonomy::SkillTaxonomy;
use crate::matching::weights::ScoringWeights;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume matcher v{}", env!("CARGO_PKG_VERSION"));

    // Skill taxonomy is required; without it no skill can be extracted
    let taxonomy = SkillTaxonomy::load(&config.skill_taxonomy_path).with_context(|| {
        format!(
            "Failed to load skill taxonomy from {}",
            config.skill_taxonomy_path.display()
        )
    })?;
    info!(
        "Skill taxonomy loaded: {} categories, {} terms",
        taxonomy.category_count(),
        taxonomy.term_count()
    );

    let weights = ScoringWeights::load(
        config.category_weights_path.as_deref(),
        config.keyword_blend_weight,
        config.skill_blend_weight,
    )
    .context("Invalid scoring weights")?;
    if !weights.is_normalized() {
        warn!(
            category_sum = weights.category_weight_sum(),
            keyword_blend = weights.keyword_blend,
            skill_blend = weights.skill_blend,
            "Scoring weights do not sum to 1; final scores may fall outside 0..=100"
        );
    }
    for (category, _) in taxonomy.categories() {
        if !weights.categories.contains_key(category) {
            warn!("Taxonomy category '{category}' has no weight and will not affect scores");
        }
    }

    let fetcher = HttpJobFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    info!("Job-description fetcher initialized ({}s timeout)", config.fetch_timeout_secs);

    // Build app state
    let state = AppState {
        config: config.clone(),
        taxonomy: Arc::new(taxonomy),
        weights: Arc::new(weights),
        fetcher: Arc::new(fetcher),
        analyses: AnalysisStore::new(config.max_retained_analyses),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
