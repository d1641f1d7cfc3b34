//! Text-level semantic index.
//!
//! Couples an [`Embedder`] with a [`VectorIndex`]: corpus texts are encoded
//! once at build time, queries are encoded the same way at search time.

use std::sync::Arc;

use crate::semantic::embeddings::{Embedder, EmbeddingError};
use crate::semantic::index::{IndexError, SearchResult, VectorIndex};

/// Errors that can occur during semantic search operations.
#[derive(Debug, thiserror::Error)]
pub enum SemanticSearchError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Embedder returned {got} vectors for {expected} texts")]
    CountMismatch { expected: usize, got: usize },
}

/// Immutable semantic index over a fixed corpus.
pub struct SemanticIndex {
    embedder: Arc<dyn Embedder>,
    index: VectorIndex,
}

impl SemanticIndex {
    /// Encode every text and store the normalized vectors.
    ///
    /// Position `i` of the index corresponds to `texts[i]`.
    pub fn build(
        embedder: Arc<dyn Embedder>,
        texts: &[String],
    ) -> Result<Self, SemanticSearchError> {
        log::info!(
            "Encoding {} texts with model '{}'",
            texts.len(),
            embedder.name()
        );

        let embeddings = embedder.embed_batch(texts)?;
        if embeddings.len() != texts.len() {
            return Err(SemanticSearchError::CountMismatch {
                expected: texts.len(),
                got: embeddings.len(),
            });
        }

        let mut index = VectorIndex::with_capacity(embedder.dimensions(), texts.len());
        for embedding in embeddings {
            index.push(embedding)?;
        }

        Ok(Self { embedder, index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn model_name(&self) -> &str {
        self.embedder.name()
    }

    /// Rank the corpus against `query`, best `k` first.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>, SemanticSearchError> {
        let query_embedding = self.embedder.embed(query)?;
        Ok(self.index.search(&query_embedding, k)?)
    }

    /// Rank the whole corpus against `query`.
    ///
    /// Never truncated, so a caller-side threshold sees every candidate.
    pub fn rank_all(&self, query: &str) -> Result<Vec<SearchResult>, SemanticSearchError> {
        self.search(query, self.index.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::HashEmbedder;

    struct ShortEmbedder;

    impl Embedder for ShortEmbedder {
        fn name(&self) -> &str {
            "short"
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_index_matches_corpus_size() {
        let corpus = texts(&["ID: 1 Local: a", "ID: 2 Local: b", "ID: 3 Local: c"]);
        let index = SemanticIndex::build(Arc::new(HashEmbedder::default()), &corpus).unwrap();

        assert_eq!(index.len(), corpus.len());
        assert_eq!(index.model_name(), "hash");
    }

    #[test]
    fn test_rank_all_is_not_truncated() {
        let corpus: Vec<String> = (0..50).map(|i| format!("ID: {i} Local: user{i}")).collect();
        let index = SemanticIndex::build(Arc::new(HashEmbedder::default()), &corpus).unwrap();

        let ranked = index.rank_all("Local user7 mail").unwrap();
        assert_eq!(ranked.len(), 50);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_exact_text_ranks_first() {
        let corpus = texts(&[
            "ID: 1 Local: ventas Remoto: ana",
            "ID: 2 Local: soporte Remoto: bob",
        ]);
        let index = SemanticIndex::build(Arc::new(HashEmbedder::default()), &corpus).unwrap();

        let ranked = index.rank_all("ID: 2 Local: soporte Remoto: bob").unwrap();
        assert_eq!(ranked[0].position, 1);
        assert!((ranked[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let corpus = texts(&["one", "two"]);
        let result = SemanticIndex::build(Arc::new(ShortEmbedder), &corpus);
        assert!(matches!(
            result,
            Err(SemanticSearchError::CountMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_zero_norm_query_is_an_error() {
        let corpus = texts(&["ID: 1 Local: a"]);
        let index = SemanticIndex::build(Arc::new(HashEmbedder::default()), &corpus).unwrap();
        assert!(matches!(
            index.rank_all("  "),
            Err(SemanticSearchError::Index(IndexError::ZeroNormVector))
        ));
    }
}
