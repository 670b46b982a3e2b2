//! Weighted aggregator: category weights -> skill score, then keyword/skill blend -> final score.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::category::CategoryScores;
use crate::matching::round2;

pub const DEFAULT_KEYWORD_BLEND: f64 = 0.30;
pub const DEFAULT_SKILL_BLEND: f64 = 0.70;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("weight '{name}' must be a finite value in [0, 1], got {value}")]
    OutOfRange { name: String, value: f64 },

    #[error("failed to read category weights at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed category weights: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Category weights plus the keyword/skill blend. Categories absent from the
/// table weigh zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub categories: BTreeMap<String, f64>,
    pub keyword_blend: f64,
    pub skill_blend: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        let categories = [
            ("languages", 0.30),
            ("frameworks", 0.25),
            ("tools", 0.20),
            ("degrees", 0.15),
            ("certs", 0.10),
        ]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect();

        Self {
            categories,
            keyword_blend: DEFAULT_KEYWORD_BLEND,
            skill_blend: DEFAULT_SKILL_BLEND,
        }
    }
}

impl ScoringWeights {
    /// Builds validated weights. `category_path`, when given, replaces the
    /// default category table with a JSON `{category: weight}` object.
    pub fn load(
        category_path: Option<&Path>,
        keyword_blend: f64,
        skill_blend: f64,
    ) -> Result<Self, WeightsError> {
        let categories = match category_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| WeightsError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&json)?
            }
            None => Self::default().categories,
        };

        let weights = Self {
            categories,
            keyword_blend,
            skill_blend,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Every weight must be finite and in [0, 1]. Sums are not enforced; see
    /// [`ScoringWeights::is_normalized`].
    pub fn validate(&self) -> Result<(), WeightsError> {
        let blends = [
            ("keyword_blend", self.keyword_blend),
            ("skill_blend", self.skill_blend),
        ];
        let all = self
            .categories
            .iter()
            .map(|(name, &value)| (name.as_str(), value))
            .chain(blends);

        for (name, value) in all {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(WeightsError::OutOfRange {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn category_weight_sum(&self) -> f64 {
        self.categories.values().sum()
    }

    /// True when both the category weights and the blend each sum to 1, which
    /// is what keeps skill and final scores inside [0, 100].
    pub fn is_normalized(&self) -> bool {
        (self.category_weight_sum() - 1.0).abs() < 1e-6
            && (self.keyword_blend + self.skill_blend - 1.0).abs() < 1e-6
    }

    fn category_weight(&self, category: &str) -> f64 {
        self.categories.get(category).copied().unwrap_or(0.0)
    }
}

/// `round(100 * Σ (score / 100 * weight), 2)`.
pub fn skill_score(category_scores: &CategoryScores, weights: &ScoringWeights) -> f64 {
    let weighted: f64 = category_scores
        .iter()
        .map(|(category, score)| score / 100.0 * weights.category_weight(category))
        .sum();
    round2(100.0 * weighted)
}

/// `round(keyword * keyword_blend + skill * skill_blend, 2)`.
pub fn final_score(keyword_score: f64, skill_score: f64, weights: &ScoringWeights) -> f64 {
    round2(keyword_score * weights.keyword_blend + skill_score * weights.skill_blend)
}
