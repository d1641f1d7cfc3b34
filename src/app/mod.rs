pub mod context;
pub mod errors;
pub mod service;

pub use context::SearchContext;
pub use errors::AppError;
pub use service::{AliasSearchResponse, SearchRequest, UserSearchResponse};
