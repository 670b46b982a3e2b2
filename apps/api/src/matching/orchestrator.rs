//! Match orchestrator: one resume against one job description.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::category::{score_categories, CategoryScores};
use crate::matching::missing::{missing_keywords, missing_skills};
use crate::matching::overlap::keyword_overlap_score;
use crate::matching::skills::{extract_skills, ExtractedSkills};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::matching::tokenizer::Document;
use crate::matching::weights::{final_score, skill_score, ScoringWeights};

/// Scores for one (resume, job description) pair. All scores are 0–100 with
/// two decimals when the weights are normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub final_score: f64,
    pub keyword_score: f64,
    pub skill_score: f64,
    pub category_scores: CategoryScores,
    pub missing_keywords: Vec<String>,
    pub missing_skills: ExtractedSkills,
    pub resume_skills: ExtractedSkills,
    pub jd_skills: ExtractedSkills,
}

/// The job-description side of a match, computed once and reused across resumes.
#[derive(Debug, Clone)]
pub struct JobProfile {
    document: Document,
    skills: ExtractedSkills,
}

impl JobProfile {
    pub fn new(jd_text: &str, taxonomy: &SkillTaxonomy) -> Self {
        Self {
            document: Document::new(jd_text),
            skills: extract_skills(jd_text, taxonomy),
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        self.document.text()
    }

    #[cfg(test)]
    pub fn skills(&self) -> &ExtractedSkills {
        &self.skills
    }

    pub fn score(
        &self,
        resume_text: &str,
        taxonomy: &SkillTaxonomy,
        weights: &ScoringWeights,
    ) -> MatchResult {
        let resume = Document::new(resume_text);
        let resume_skills = extract_skills(resume_text, taxonomy);

        let keyword_score = keyword_overlap_score(resume.text(), self.document.text());
        let category_scores = score_categories(&resume_skills, &self.skills);
        let skill_score = skill_score(&category_scores, weights);
        let final_score = final_score(keyword_score, skill_score, weights);

        debug!(
            keyword_score,
            skill_score, final_score, "scored resume against job description"
        );

        MatchResult {
            final_score,
            keyword_score,
            skill_score,
            category_scores,
            missing_keywords: missing_keywords(self.document.tokens(), resume.tokens()),
            missing_skills: missing_skills(&resume_skills, &self.skills),
            resume_skills,
            jd_skills: self.skills.clone(),
        }
    }
}

/// Pure and deterministic. Empty inputs yield zero scores rather than errors;
/// callers gate on non-empty text. The ranker scores through [`JobProfile`]
/// directly so the JD side is built once per batch.
#[allow(dead_code)]
pub fn analyze(
    resume_text: &str,
    jd_text: &str,
    taxonomy: &SkillTaxonomy,
    weights: &ScoringWeights,
) -> MatchResult {
    JobProfile::new(jd_text, taxonomy).score(resume_text, taxonomy, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn languages_only() -> (SkillTaxonomy, ScoringWeights) {
        let taxonomy = SkillTaxonomy::from_json_str(r#"{"languages": ["python", "java"]}"#).unwrap();
        let weights = ScoringWeights {
            categories: [("languages".to_string(), 1.0)].into_iter().collect(),
            ..ScoringWeights::default()
        };
        (taxonomy, weights)
    }

    fn bundled() -> SkillTaxonomy {
        SkillTaxonomy::load(concat!(env!("CARGO_MANIFEST_DIR"), "/data/skill_categories.json"))
            .unwrap()
    }

    #[test]
    fn test_half_language_match_scenario() {
        let (taxonomy, weights) = languages_only();
        let result = analyze("python experience", "python java required", &taxonomy, &weights);
        assert_eq!(result.category_scores["languages"], 50.0);
        assert_eq!(result.skill_score, 50.0);
        assert_eq!(result.missing_skills["languages"], vec!["java"]);
        // jd terms: python, java, required (3); resume shares python
        assert_eq!(result.keyword_score, 33.33);
        assert_eq!(result.final_score, 45.0);
    }

    #[test]
    fn test_empty_jd_yields_zero_scores_without_panicking() {
        let (taxonomy, weights) = languages_only();
        let result = analyze("python", "", &taxonomy, &weights);
        assert_eq!(result.keyword_score, 0.0);
        assert_eq!(result.skill_score, 0.0);
        assert_eq!(result.final_score, 0.0);
        assert!(result.missing_keywords.is_empty());
        assert!(result.missing_skills["languages"].is_empty());
    }

    #[test]
    fn test_empty_resume_yields_zero_scores() {
        let (taxonomy, weights) = languages_only();
        let result = analyze("", "python java", &taxonomy, &weights);
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.missing_skills["languages"], vec!["python", "java"]);
    }

    #[test]
    fn test_identical_inputs_are_idempotent() {
        let taxonomy = bundled();
        let weights = ScoringWeights::default();
        let jd = "Backend engineer: Python, Django, PostgreSQL, Docker, AWS. Bachelor in Computer Science.";
        let resume = "Built Django services in Python; deployed with Docker on AWS.";
        let first = analyze(resume, jd, &taxonomy, &weights);
        let second = analyze(resume, jd, &taxonomy, &weights);
        assert_eq!(first, second);
        assert_eq!(first.final_score.to_bits(), second.final_score.to_bits());
    }

    #[test]
    fn test_scores_bounded_with_default_weights() {
        let taxonomy = bundled();
        let weights = ScoringWeights::default();
        let jd = "Python Kubernetes Terraform AWS Certified PMP master degree";
        for resume in ["", "python", jd, "kubernetes kubernetes kubernetes"] {
            let result = analyze(resume, jd, &taxonomy, &weights);
            for score in [result.final_score, result.keyword_score, result.skill_score] {
                assert!((0.0..=100.0).contains(&score), "{score}");
            }
            assert!(result.missing_keywords.len() <= 20);
        }
    }

    #[test]
    fn test_identical_documents_score_full_marks() {
        let taxonomy = bundled();
        let weights = ScoringWeights::default();
        let jd = "Python Django Docker Bachelor AWS Certified";
        let result = analyze(jd, jd, &taxonomy, &weights);
        assert_eq!(result.keyword_score, 100.0);
        assert!(result.missing_keywords.is_empty());
        assert!(result.missing_skills.values().all(Vec::is_empty));
    }

    #[test]
    fn test_missing_keywords_use_normalized_tokens() {
        let (taxonomy, weights) = languages_only();
        let result = analyze(
            "I managed teams",
            "Managing distributed teams",
            &taxonomy,
            &weights,
        );
        assert_eq!(result.missing_keywords, vec!["distribute"]);
    }

    #[test]
    fn test_profile_reuse_matches_analyze() {
        let (taxonomy, weights) = languages_only();
        let profile = JobProfile::new("python java", &taxonomy);
        let via_profile = profile.score("java", &taxonomy, &weights);
        let direct = analyze("java", "python java", &taxonomy, &weights);
        assert_eq!(via_profile, direct);
        assert_eq!(profile.text(), "python java");
        assert_eq!(profile.skills()["languages"].len(), 2);
        let _: &BTreeMap<String, f64> = &direct.category_scores;
    }
}
