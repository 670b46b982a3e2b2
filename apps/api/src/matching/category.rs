//! Category scorer: per-category share of JD skills the resume also has.

use std::collections::{BTreeMap, BTreeSet};

use crate::matching::round2;
use crate::matching::skills::ExtractedSkills;

pub type CategoryScores = BTreeMap<String, f64>;

/// Scores every category present in the JD extraction.
///
/// A category the JD names no skills in scores 0.0, never full credit.
/// Duplicate term strings collapse before counting.
pub fn score_categories(resume: &ExtractedSkills, jd: &ExtractedSkills) -> CategoryScores {
    jd.iter()
        .map(|(category, jd_terms)| {
            let jd_set: BTreeSet<&str> = jd_terms.iter().map(String::as_str).collect();
            if jd_set.is_empty() {
                return (category.clone(), 0.0);
            }
            let resume_set: BTreeSet<&str> = resume
                .get(category)
                .map(|terms| terms.iter().map(String::as_str).collect())
                .unwrap_or_default();
            let shared = jd_set.intersection(&resume_set).count();
            let score = round2(100.0 * shared as f64 / jd_set.len() as f64);
            (category.clone(), score)
        })
        .collect()
}
