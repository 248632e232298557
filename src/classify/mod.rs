//! Classifier invocation and score ranking.

mod backend;
mod backends;

pub use backend::ClassifierBackend;
pub use backends::StubBackend;

#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;

/// Rank raw classifier scores: descending by score, ties broken by ascending
/// class index so the output is deterministic.
pub fn rank_scores(scores: &[f32]) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}
