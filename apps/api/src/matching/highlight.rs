//! Presentation helpers: per-category skill comparison and JD highlighting.
//!
//! Highlighting is word-boundary aware and is deliberately separate from the
//! substring containment used for scoring in `skills`.

use std::collections::{BTreeMap, BTreeSet};

use regex::RegexBuilder;
use serde::Serialize;
use tracing::warn;

use crate::matching::skills::ExtractedSkills;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryComparison {
    /// Resume skills the job description also names.
    pub resume_matched: Vec<String>,
    pub jd_matched: Vec<String>,
    pub jd_missing: Vec<String>,
}

pub fn compare_skills(
    resume: &ExtractedSkills,
    jd: &ExtractedSkills,
) -> BTreeMap<String, CategoryComparison> {
    jd.iter()
        .map(|(category, jd_terms)| {
            let jd_set: BTreeSet<&str> = jd_terms.iter().map(String::as_str).collect();
            let resume_matched: Vec<String> = resume
                .get(category)
                .map(|terms| {
                    terms
                        .iter()
                        .filter(|t| jd_set.contains(t.as_str()))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            let (jd_matched, jd_missing) = jd_terms
                .iter()
                .cloned()
                .partition(|t| resume_matched.contains(t));
            (
                category.clone(),
                CategoryComparison {
                    resume_matched,
                    jd_matched,
                    jd_missing,
                },
            )
        })
        .collect()
}

/// Flattens the resume skills the JD also requires, for [`highlight_skills`].
pub fn shared_skills(resume: &ExtractedSkills, jd: &ExtractedSkills) -> BTreeSet<String> {
    compare_skills(resume, jd)
        .into_values()
        .flat_map(|c| c.resume_matched)
        .collect()
}

pub fn all_skills(skills: &ExtractedSkills) -> BTreeSet<String> {
    skills.values().flatten().cloned().collect()
}

/// Wraps every skill occurrence in `text` in a `match` or `missing` span.
///
/// Longest terms win at a shared start; matching is case-insensitive and
/// multi-word terms accept any whitespace run between words. Everything else
/// is HTML-escaped.
pub fn highlight_skills(
    text: &str,
    resume_skills: &BTreeSet<String>,
    jd_skills: &BTreeSet<String>,
) -> String {
    let resume_keys: BTreeSet<String> = resume_skills.iter().map(|s| skill_key(s)).collect();
    let jd_keys: BTreeSet<String> = jd_skills.iter().map(|s| skill_key(s)).collect();

    let mut terms: Vec<&String> = resume_keys.union(&jd_keys).filter(|s| !s.is_empty()).collect();
    if terms.is_empty() {
        return escape_html(text);
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = terms
        .iter()
        .map(|term| term_pattern(term))
        .collect::<Vec<_>>()
        .join("|");
    let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => regex,
        Err(e) => {
            warn!("Skill highlight pattern failed to compile: {e}");
            return escape_html(text);
        }
    };

    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut last = 0;
    for found in regex.find_iter(text) {
        // "c#" must not light up inside "c#x"; the pattern cannot express
        // that closing boundary without lookahead.
        let ends_on_symbol = !found.as_str().chars().last().is_some_and(is_word_char);
        if ends_on_symbol && text[found.end()..].chars().next().is_some_and(is_word_char) {
            continue;
        }
        out.push_str(&escape_html(&text[last..found.start()]));
        let key = skill_key(found.as_str());
        let class = if resume_keys.contains(&key) {
            Some("match")
        } else if jd_keys.contains(&key) {
            Some("missing")
        } else {
            None
        };
        match class {
            Some(class) => {
                out.push_str(&format!(
                    "<span class=\"skill {class}\">{}</span>",
                    escape_html(found.as_str())
                ));
            }
            None => out.push_str(&escape_html(found.as_str())),
        }
        last = found.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

fn skill_key(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `\b` is only applied on edges that are word characters, so terms like
/// `c++` or `.net` still match. A symbol at the end is bounded in
/// [`highlight_skills`] instead.
fn term_pattern(term: &str) -> String {
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let start = if term.chars().next().is_some_and(is_word_char) { r"\b" } else { "" };
    let end = if term.chars().last().is_some_and(is_word_char) { r"\b" } else { "" };
    format!("{start}{body}{end}")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
