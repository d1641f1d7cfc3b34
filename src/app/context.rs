use crate::{
    app::{
        errors::AppError,
        service::{run_search, AliasSearchResponse, SearchRequest, UserSearchResponse},
    },
    records::{AliasRecord, SearchRecord, UserRecord},
    search::CollectionIndex,
    semantic::Embedder,
    store::RecordStore,
};
use serde::Serialize;
use std::sync::Arc;

/// Default semantic thresholds per collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub users: f32,
    pub aliases: f32,
}

/// Everything a request needs, built once before serving.
///
/// Read-only after [`SearchContext::initialize`]; share it behind an `Arc`.
pub struct SearchContext {
    store: Arc<dyn RecordStore>,
    model_name: String,
    users: CollectionIndex<UserRecord>,
    aliases: CollectionIndex<AliasRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextStats {
    pub model: String,
    pub users: usize,
    pub aliases: usize,
}

impl SearchContext {
    /// Load both snapshots and build their indexes.
    ///
    /// Any failure here is fatal: an empty collection, a store error or an
    /// embedding error means the service must not start.
    pub fn initialize(
        store: Arc<dyn RecordStore>,
        embedder: Arc<dyn Embedder>,
        thresholds: Thresholds,
    ) -> Result<Self, AppError> {
        log::info!("Loading users from store...");
        let users = load_snapshot::<UserRecord>(store.as_ref())?;
        let users = CollectionIndex::build(users, embedder.clone(), thresholds.users)?;

        log::info!("Loading aliases from store...");
        let aliases = load_snapshot::<AliasRecord>(store.as_ref())?;
        let aliases = CollectionIndex::build(aliases, embedder.clone(), thresholds.aliases)?;

        log::info!("Search indexes ready");

        Ok(Self {
            store,
            model_name: embedder.name().to_string(),
            users,
            aliases,
        })
    }

    pub fn users(&self) -> &CollectionIndex<UserRecord> {
        &self.users
    }

    pub fn aliases(&self) -> &CollectionIndex<AliasRecord> {
        &self.aliases
    }

    pub fn search_users(&self, request: &SearchRequest) -> UserSearchResponse {
        run_search(self.store.as_ref(), &self.users, request).into()
    }

    pub fn search_aliases(&self, request: &SearchRequest) -> AliasSearchResponse {
        run_search(self.store.as_ref(), &self.aliases, request).into()
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats {
            model: self.model_name.clone(),
            users: self.users.len(),
            aliases: self.aliases.len(),
        }
    }
}

/// Fetch every live row of a collection. Empty is an error.
pub fn load_snapshot<R: SearchRecord>(store: &dyn RecordStore) -> Result<Vec<R>, AppError> {
    let records = R::load_live(store)?;
    if records.is_empty() {
        return Err(AppError::EmptySnapshot(R::COLLECTION));
    }
    log::info!("Loaded {} {}", records.len(), R::COLLECTION);
    Ok(records)
}
