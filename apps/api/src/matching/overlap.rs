//! Keyword overlap scorer: raw term-frequency overlap restricted to the JD vocabulary.

use crate::matching::round2;
use crate::matching::tokenizer::count_terms;

/// `round(100 * Σ min(resume_count, jd_count) / Σ jd_count, 2)` over the joint vocabulary.
///
/// Returns 0.0 when the job description has no countable terms.
pub fn keyword_overlap_score(resume_text: &str, jd_text: &str) -> f64 {
    let jd_counts = count_terms(jd_text);
    let total: u32 = jd_counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    let resume_counts = count_terms(resume_text);
    // Terms only in the resume have a jd count of zero and add nothing to either sum.
    let overlap: u32 = jd_counts
        .iter()
        .map(|(term, &jd_count)| {
            resume_counts
                .get(term)
                .map_or(0, |&resume_count| resume_count.min(jd_count))
        })
        .sum();

    round2(100.0 * f64::from(overlap) / f64::from(total))
}
