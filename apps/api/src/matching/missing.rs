//! Missing-term calculator: lexical keyword gap and per-category skill gap.

use std::collections::{BTreeMap, BTreeSet};

use crate::matching::skills::ExtractedSkills;

pub const MAX_MISSING_KEYWORDS: usize = 20;

/// JD tokens absent from the resume, first [`MAX_MISSING_KEYWORDS`] in set order.
///
/// Set order is lexicographic, not importance.
pub fn missing_keywords(jd_tokens: &BTreeSet<String>, resume_tokens: &BTreeSet<String>) -> Vec<String> {
    jd_tokens
        .difference(resume_tokens)
        .take(MAX_MISSING_KEYWORDS)
        .cloned()
        .collect()
}

/// Per JD category: JD matched terms the resume did not match. Uncapped.
pub fn missing_skills(
    resume: &ExtractedSkills,
    jd: &ExtractedSkills,
) -> BTreeMap<String, Vec<String>> {
    jd.iter()
        .map(|(category, jd_terms)| {
            let resume_set: BTreeSet<&str> = resume
                .get(category)
                .map(|terms| terms.iter().map(String::as_str).collect())
                .unwrap_or_default();
            let mut seen = BTreeSet::new();
            let missing = jd_terms
                .iter()
                .filter(|term| !resume_set.contains(term.as_str()) && seen.insert(term.as_str()))
                .cloned()
                .collect();
            (category.clone(), missing)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_missing_keywords_is_set_difference() {
        let jd = set(&["rust", "kafka", "team"]);
        let resume = set(&["rust", "python"]);
        assert_eq!(missing_keywords(&jd, &resume), vec!["kafka", "team"]);
    }

    #[test]
    fn test_missing_keywords_capped_at_twenty() {
        let jd: BTreeSet<String> = (0..50).map(|i| format!("term{i:02}")).collect();
        let missing = missing_keywords(&jd, &BTreeSet::new());
        assert_eq!(missing.len(), MAX_MISSING_KEYWORDS);
        assert_eq!(missing[0], "term00");
    }

    #[test]
    fn test_missing_skills_per_category() {
        let jd: ExtractedSkills = [
            ("languages".to_string(), vec!["python".to_string(), "java".to_string()]),
            ("tools".to_string(), vec![]),
        ]
        .into_iter()
        .collect();
        let resume: ExtractedSkills = [("languages".to_string(), vec!["python".to_string()])]
            .into_iter()
            .collect();

        let missing = missing_skills(&resume, &jd);
        let languages: BTreeSet<&str> = missing["languages"].iter().map(String::as_str).collect();
        assert_eq!(languages, BTreeSet::from(["java"]));
        assert!(missing["tools"].is_empty());
    }

    #[test]
    fn test_missing_skills_collapse_duplicates() {
        let jd: ExtractedSkills = [(
            "tools".to_string(),
            vec!["git".to_string(), "git".to_string()],
        )]
        .into_iter()
        .collect();
        let missing = missing_skills(&ExtractedSkills::new(), &jd);
        assert_eq!(missing["tools"], vec!["git"]);
    }
}
