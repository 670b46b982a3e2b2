//! Skill taxonomy: category name -> ordered skill terms, loaded once at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read skill taxonomy at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed skill taxonomy: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("skill taxonomy defines no categories")]
    Empty,

    #[error("skill taxonomy category '{category}' contains an empty term")]
    EmptyTerm { category: String },
}

/// Immutable for the life of the process; shared behind an `Arc`.
///
/// Terms are trimmed and lowercased at construction. Categories iterate in
/// lexicographic order, terms in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SkillTaxonomy {
    categories: BTreeMap<String, Vec<String>>,
}

impl SkillTaxonomy {
    pub fn new(categories: BTreeMap<String, Vec<String>>) -> Result<Self, TaxonomyError> {
        if categories.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut normalized = BTreeMap::new();
        for (category, terms) in categories {
            let mut cleaned = Vec::with_capacity(terms.len());
            for term in terms {
                let term = term.trim().to_lowercase();
                if term.is_empty() {
                    return Err(TaxonomyError::EmptyTerm { category });
                }
                cleaned.push(term);
            }
            normalized.insert(category, cleaned);
        }

        Ok(Self {
            categories: normalized,
        })
    }

    /// Parses `{ "<category>": ["term", ...], ... }`.
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        let categories: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::new(categories)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, terms)| (name.as_str(), terms.as_slice()))
    }

    #[cfg(test)]
    pub fn terms(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn term_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_and_normalizes_terms() {
        let taxonomy =
            SkillTaxonomy::from_json_str(r#"{"languages": [" Python ", "Java"], "tools": []}"#)
                .unwrap();
        assert_eq!(taxonomy.category_count(), 2);
        assert_eq!(
            taxonomy.terms("languages").unwrap(),
            &["python".to_string(), "java".to_string()]
        );
        assert_eq!(taxonomy.terms("tools").unwrap().len(), 0);
        assert!(taxonomy.terms("degrees").is_none());
    }

    #[test]
    fn test_categories_iterate_in_name_order() {
        let taxonomy =
            SkillTaxonomy::from_json_str(r#"{"tools": ["git"], "certs": ["pmp"]}"#).unwrap();
        let names: Vec<&str> = taxonomy.categories().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["certs", "tools"]);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = SkillTaxonomy::from_json_str(r#"{"languages": "python"}"#).unwrap_err();
        assert!(matches!(err, TaxonomyError::Parse(_)));
    }

    #[test]
    fn test_empty_taxonomy_is_rejected() {
        let err = SkillTaxonomy::from_json_str("{}").unwrap_err();
        assert!(matches!(err, TaxonomyError::Empty));
    }

    #[test]
    fn test_blank_term_is_rejected() {
        let err = SkillTaxonomy::from_json_str(r#"{"languages": ["rust", "  "]}"#).unwrap_err();
        assert!(
            matches!(err, TaxonomyError::EmptyTerm { ref category } if category == "languages")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SkillTaxonomy::load("/definitely/not/here/skills.json").unwrap_err();
        assert!(matches!(err, TaxonomyError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"frameworks": ["Django", "Flask"]}}"#).unwrap();
        let taxonomy = SkillTaxonomy::load(file.path()).unwrap();
        assert_eq!(taxonomy.term_count(), 2);
    }

    #[test]
    fn test_bundled_taxonomy_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/skill_categories.json");
        let taxonomy = SkillTaxonomy::load(path).unwrap();
        for category in ["languages", "frameworks", "tools", "degrees", "certs"] {
            assert!(taxonomy.terms(category).is_some(), "missing {category}");
        }
    }
}
