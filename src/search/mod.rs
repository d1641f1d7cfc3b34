//! Hybrid retrieval: routing, semantic matching, resolution and paging.

pub mod collection;
pub mod paginate;
pub mod resolver;
pub mod router;

pub use collection::CollectionIndex;
pub use paginate::{paginate, Page};
pub use router::{route, QueryStrategy};
