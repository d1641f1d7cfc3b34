//! Per-request choice between exact and semantic matching.

use crate::semantic::SearchResult;

/// How a query is answered. Both variants resolve to the same output shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryStrategy<'q> {
    /// Case-insensitive substring match against the live store.
    Exact { needle: &'q str },
    /// Nearest-neighbor match against the startup snapshot.
    Semantic { text: &'q str, threshold: f32 },
}

impl QueryStrategy<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            QueryStrategy::Exact { .. } => "exact",
            QueryStrategy::Semantic { .. } => "semantic",
        }
    }
}

/// Route on whitespace token count alone.
///
/// Zero or one token goes to the exact path. An empty or blank query becomes
/// an empty needle, which matches every live row.
pub fn route(query: &str, threshold: f32) -> QueryStrategy<'_> {
    let mut tokens = query.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (None, _) => QueryStrategy::Exact { needle: "" },
        (Some(token), None) => QueryStrategy::Exact { needle: token },
        (Some(_), Some(_)) => QueryStrategy::Semantic {
            text: query.trim(),
            threshold,
        },
    }
}

/// Keep hits scoring at least `threshold`, best first.
pub fn apply_threshold(mut hits: Vec<SearchResult>, threshold: f32) -> Vec<SearchResult> {
    hits.retain(|hit| hit.score >= threshold);
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.position.cmp(&b.position))
    });
    hits
}
