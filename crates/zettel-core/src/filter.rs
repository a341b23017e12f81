// crates/zettel-core/src/filter.rs - selection predicate for SelectMeta

use crate::meta::Meta;

/// A selection predicate passed to `Place::select_meta`.
///
/// Grounded on `search.rs`'s `SearchConfig` query-building shape, reduced
/// to the spec's plain value-object semantics: no tantivy, no scoring,
/// just a predicate over a [`Meta`]. `Filter::none()` (or any code path
/// that never builds one) matches every Meta, per spec.md §4.1's
/// "Passing filter=nil, sorter=nil returns the full, unfiltered list."
pub struct Filter {
    predicate: Box<dyn Fn(&Meta) -> bool + Send + Sync>,
}

impl Filter {
    pub fn new(predicate: impl Fn(&Meta) -> bool + Send + Sync + 'static) -> Self {
        Filter {
            predicate: Box::new(predicate),
        }
    }

    /// Case-insensitive substring match over title and rest-pair values;
    /// grounds `zettel-cli`'s `search` command (spec.md §6 supplement).
    pub fn text_contains(needle: impl Into<String>) -> Self {
        let needle = needle.into().to_lowercase();
        Filter::new(move |meta| {
            meta.title().to_lowercase().contains(&needle)
                || meta
                    .rest_pairs()
                    .iter()
                    .any(|(_, v)| v.to_lowercase().contains(&needle))
        })
    }

    pub fn by_role(role: impl Into<String>) -> Self {
        let role = role.into();
        Filter::new(move |meta| meta.get("role") == Some(role.as_str()))
    }

    pub fn matches(&self, meta: &Meta) -> bool {
        (self.predicate)(meta)
    }
}
