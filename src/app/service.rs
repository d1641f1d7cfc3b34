use crate::{
    app::errors::AppError,
    records::{AliasRecord, SearchRecord, UserView},
    search::{paginate, resolver, route, CollectionIndex, Page, QueryStrategy},
    store::RecordStore,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// A search over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub page: usize,
    pub limit: NonZeroUsize,
    /// Overrides the collection's default semantic threshold.
    pub threshold: Option<f32>,
}

impl SearchRequest {
    pub fn new(
        query: impl Into<String>,
        page: usize,
        limit: usize,
        threshold: Option<f32>,
    ) -> Result<Self, AppError> {
        let limit = NonZeroUsize::new(limit)
            .ok_or_else(|| AppError::BadRequest("limit must be greater than 0".to_string()))?;

        if let Some(threshold) = threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(AppError::BadRequest(format!(
                    "threshold must be between -1.0 and 1.0, got {threshold}"
                )));
            }
        }

        Ok(Self {
            query: query.into(),
            page,
            limit,
            threshold,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserSearchResponse {
    pub total_count: usize,
    pub total_pages: usize,
    pub users: Vec<UserView>,
}

impl From<Page<UserView>> for UserSearchResponse {
    fn from(page: Page<UserView>) -> Self {
        Self {
            total_count: page.total_count,
            total_pages: page.total_pages,
            users: page.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasSearchResponse {
    pub total_count: usize,
    pub total_pages: usize,
    pub alias: Vec<AliasRecord>,
}

impl From<Page<AliasRecord>> for AliasSearchResponse {
    fn from(page: Page<AliasRecord>) -> Self {
        Self {
            total_count: page.total_count,
            total_pages: page.total_pages,
            alias: page.items,
        }
    }
}

/// Route, execute, resolve and paginate one request.
///
/// Store and encoding failures are logged and answered with an empty list.
pub fn run_search<R: SearchRecord>(
    store: &dyn RecordStore,
    collection: &CollectionIndex<R>,
    request: &SearchRequest,
) -> Page<R::View> {
    let threshold = request
        .threshold
        .unwrap_or_else(|| collection.default_threshold());
    let strategy = route(&request.query, threshold);

    log::debug!(
        "{} search: strategy={} query={:?}",
        R::COLLECTION,
        strategy.name(),
        request.query
    );

    let views = match strategy {
        QueryStrategy::Exact { needle } => match R::find_matching(store, needle) {
            Ok(rows) => resolver::project(&rows),
            Err(err) => {
                log::error!("{} exact search failed: {err}", R::COLLECTION);
                Vec::new()
            }
        },
        QueryStrategy::Semantic { text, threshold } => {
            match collection.semantic_matches(text, threshold) {
                Ok(hits) => resolver::project(hits.into_iter().map(|(record, _)| record)),
                Err(err) => {
                    log::error!("{} semantic search failed: {err}", R::COLLECTION);
                    Vec::new()
                }
            }
        }
    };

    paginate(views, request.page, request.limit)
}
