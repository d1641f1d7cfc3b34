use crate::{
    records::Collection,
    semantic::{EmbeddingError, SemanticSearchError},
    store::StoreError,
};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("no live {0} found in the store")]
    EmptySnapshot(Collection),

    #[error("duplicate {collection} id {id} in snapshot")]
    DuplicateId { collection: Collection, id: i64 },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("semantic index error: {0}")]
    Semantic(#[from] SemanticSearchError),
}
