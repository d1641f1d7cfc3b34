//! Per-collection snapshot with its corpus, id lookup and semantic index.

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::errors::AppError;
use crate::corpus::Corpus;
use crate::records::SearchRecord;
use crate::search::{resolver, router};
use crate::semantic::{Embedder, SemanticIndex, SemanticSearchError};

/// Immutable search state for one collection.
///
/// Built once at startup. Position `i` refers to the same record in
/// `records`, the corpus id map and the semantic index.
pub struct CollectionIndex<R: SearchRecord> {
    records: Vec<R>,
    by_id: HashMap<i64, usize>,
    corpus: Corpus,
    semantic: SemanticIndex,
    default_threshold: f32,
}

impl<R: SearchRecord> CollectionIndex<R> {
    pub fn build(
        records: Vec<R>,
        embedder: Arc<dyn Embedder>,
        default_threshold: f32,
    ) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::EmptySnapshot(R::COLLECTION));
        }

        let mut by_id = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if by_id.insert(record.id(), position).is_some() {
                return Err(AppError::DuplicateId {
                    collection: R::COLLECTION,
                    id: record.id(),
                });
            }
        }

        let corpus = Corpus::build(&records);
        for entry in corpus.entries() {
            log::trace!(
                "{} corpus #{} (id {}): {}",
                R::COLLECTION,
                entry.position,
                entry.id,
                entry.text
            );
        }

        let semantic = SemanticIndex::build(embedder, corpus.texts())?;

        log::info!(
            "Indexed {} {} with model '{}'",
            semantic.len(),
            R::COLLECTION,
            semantic.model_name()
        );

        Ok(Self {
            records,
            by_id,
            corpus,
            semantic,
            default_threshold,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index_len(&self) -> usize {
        self.semantic.len()
    }

    pub fn default_threshold(&self) -> f32 {
        self.default_threshold
    }

    /// O(1) lookup of a snapshot record by id.
    pub fn get(&self, id: i64) -> Option<&R> {
        self.by_id.get(&id).map(|position| &self.records[*position])
    }

    /// Snapshot records scoring at least `threshold` against `text`, best
    /// first, each with its score.
    pub fn semantic_matches(
        &self,
        text: &str,
        threshold: f32,
    ) -> Result<Vec<(&R, f32)>, SemanticSearchError> {
        let ranked = self.semantic.rank_all(text)?;
        let hits = router::apply_threshold(ranked, threshold);
        Ok(resolver::resolve_hits(self, &hits))
    }
}
