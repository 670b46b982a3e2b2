use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::weights::{DEFAULT_KEYWORD_BLEND, DEFAULT_SKILL_BLEND};

/// Relative to the working directory; run from `apps/api` or set `SKILL_TAXONOMY_PATH`.
const DEFAULT_TAXONOMY_PATH: &str = "data/skill_categories.json";

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub skill_taxonomy_path: PathBuf,
    pub category_weights_path: Option<PathBuf>,
    pub keyword_blend_weight: f64,
    pub skill_blend_weight: f64,
    pub fetch_timeout_secs: u64,
    pub pdf_extract_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub max_retained_analyses: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skill_taxonomy_path: std::env::var("SKILL_TAXONOMY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TAXONOMY_PATH)),
            category_weights_path: std::env::var("CATEGORY_WEIGHTS_PATH")
                .ok()
                .map(PathBuf::from),
            keyword_blend_weight: parse_env("KEYWORD_BLEND_WEIGHT", DEFAULT_KEYWORD_BLEND)?,
            skill_blend_weight: parse_env("SKILL_BLEND_WEIGHT", DEFAULT_SKILL_BLEND)?,
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 20)?,
            pdf_extract_timeout_secs: parse_env("PDF_EXTRACT_TIMEOUT_SECS", 30)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            max_retained_analyses: parse_env("MAX_RETAINED_ANALYSES", 32)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
