//! Maps matches back to full records and their response shape.

use crate::records::SearchRecord;
use crate::search::collection::CollectionIndex;
use crate::semantic::SearchResult;

/// Resolve index positions to snapshot records, keeping hit order.
///
/// Positions without an id, or ids missing from the snapshot, are dropped.
pub fn resolve_hits<'a, R: SearchRecord>(
    collection: &'a CollectionIndex<R>,
    hits: &[SearchResult],
) -> Vec<(&'a R, f32)> {
    hits.iter()
        .filter_map(|hit| {
            let resolved = collection
                .corpus()
                .id_at(hit.position)
                .and_then(|id| collection.get(id));
            if resolved.is_none() {
                log::debug!(
                    "dropping unresolved {} hit at position {}",
                    R::COLLECTION,
                    hit.position
                );
            }
            resolved.map(|record| (record, hit.score))
        })
        .collect()
}

/// Project records to their response shape.
pub fn project<'a, R: SearchRecord>(records: impl IntoIterator<Item = &'a R>) -> Vec<R::View> {
    records.into_iter().map(R::view).collect()
}
