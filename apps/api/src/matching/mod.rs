// Matching engine: normalization, lexical overlap, taxonomy skill extraction,
// category scoring, weighted aggregation, gap computation and ranking.
// Everything here is pure and synchronous; I/O lives in `ingest`.

pub mod category;
pub mod highlight;
pub mod missing;
pub mod orchestrator;
pub mod overlap;
pub mod ranker;
pub mod skills;
pub mod stop_words;
pub mod taxonomy;
pub mod tokenizer;
pub mod weights;

/// Rounds to two decimals, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
