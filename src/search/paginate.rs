use std::num::NonZeroUsize;

/// One page of an ordered result list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total_count: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
}

/// Slice `items` into 1-based page `page` of `limit` entries.
///
/// Pages past the end, and page 0, come back empty.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: NonZeroUsize) -> Page<T> {
    let total_count = items.len();
    let limit = limit.get();
    let total_pages = total_count.div_ceil(limit);

    let items = match page.checked_sub(1).and_then(|p| p.checked_mul(limit)) {
        Some(start) if start < total_count => items.into_iter().skip(start).take(limit).collect(),
        _ => Vec::new(),
    };

    Page {
        total_count,
        total_pages,
        items,
    }
}
