//! Multi-resume ranker.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::orchestrator::{JobProfile, MatchResult};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::matching::weights::ScoringWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeInput {
    pub resume_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based.
    pub rank: usize,
    pub resume_id: String,
    pub result: MatchResult,
}

/// Descending by final score; equal scores keep input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedResultSet {
    pub entries: Vec<RankedEntry>,
}

impl RankedResultSet {
    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn get(&self, resume_id: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.resume_id == resume_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scores each resume independently (in parallel) against one job description.
pub fn rank_resumes(
    resumes: &[ResumeInput],
    jd_text: &str,
    taxonomy: &SkillTaxonomy,
    weights: &ScoringWeights,
) -> RankedResultSet {
    let profile = JobProfile::new(jd_text, taxonomy);

    // `collect` on an indexed parallel iterator preserves input order.
    let scored: Vec<(String, MatchResult)> = resumes
        .par_iter()
        .map(|resume| {
            (
                resume.resume_id.clone(),
                profile.score(&resume.text, taxonomy, weights),
            )
        })
        .collect();

    debug!(resumes = scored.len(), "ranked resumes");
    rank_scored(scored)
}

fn rank_scored(mut scored: Vec<(String, MatchResult)>) -> RankedResultSet {
    // `sort_by` is stable: ties keep upload order.
    scored.sort_by(|a, b| b.1.final_score.total_cmp(&a.1.final_score));

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(i, (resume_id, result))| RankedEntry {
            rank: i + 1,
            resume_id,
            result,
        })
        .collect();

    RankedResultSet { entries }
}
