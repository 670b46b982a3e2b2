//! Skill extractor: plain case-insensitive substring containment per taxonomy term.
//!
//! Not token-boundary aware. A short term inside a longer one ("java" in
//! "javascript") is recorded as matched; boundary-aware matching exists only
//! in `highlight`, and must not replace this pass.

use std::collections::BTreeMap;

use crate::matching::taxonomy::SkillTaxonomy;

/// Category -> matched terms in taxonomy order. Every taxonomy category is present.
pub type ExtractedSkills = BTreeMap<String, Vec<String>>;

pub fn extract_skills(text: &str, taxonomy: &SkillTaxonomy) -> ExtractedSkills {
    let lowered = text.to_lowercase();
    taxonomy
        .categories()
        .map(|(category, terms)| {
            let matched = terms
                .iter()
                .filter(|term| lowered.contains(term.as_str()))
                .cloned()
                .collect();
            (category.to_string(), matched)
        })
        .collect()
}
