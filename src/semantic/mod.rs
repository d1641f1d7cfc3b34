//! Semantic search infrastructure for record embeddings.
//!
//! This module provides local semantic search capabilities using fastembed-rs
//! for generating embeddings and in-memory vector similarity search.
//!
//! # Architecture
//!
//! - `embeddings`: `Embedder` trait and the fastembed-backed model
//! - `hash_embedder`: Download-free lexical embedder
//! - `index`: Flat inner-product index over unit vectors
//! - `service`: Text-level index built once from a corpus

pub mod embeddings;
mod hash_embedder;
mod index;
mod service;

use std::path::PathBuf;
use std::sync::Arc;

pub use embeddings::{Embedder, EmbeddingError, EmbeddingModel};
pub use hash_embedder::{HashEmbedder, HASH_EMBEDDER};
pub use index::{IndexError, SearchResult, VectorIndex};
pub use service::{SemanticIndex, SemanticSearchError};

/// Default embedding model name. Multilingual, the stored records are Spanish.
pub const DEFAULT_MODEL: &str = "paraphrase-multilingual-minilm-l12-v2";

/// Default similarity threshold for user search
pub const DEFAULT_USER_THRESHOLD: f32 = 0.45;

/// Default similarity threshold for alias search
pub const DEFAULT_ALIAS_THRESHOLD: f32 = 0.35;

/// Resolve a configured model name to an embedder.
pub fn load_embedder(
    model_name: &str,
    cache_dir: PathBuf,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    if model_name.eq_ignore_ascii_case(HASH_EMBEDDER) {
        log::warn!("Using lexical hash embedder, semantic search will only match shared tokens");
        return Ok(Arc::new(HashEmbedder::default()));
    }

    log::info!("Loading embedding model '{}'", model_name);
    Ok(Arc::new(EmbeddingModel::new(model_name, cache_dir)?))
}
