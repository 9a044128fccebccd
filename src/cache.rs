use std::collections::HashMap;

use crate::models::{Hit, Page};

/// Per-query accumulated search results.
///
/// Updates never mutate in place: `apply_page` and `remove_hit` return a new
/// cache and leave every other query's entry as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCache {
    entries: HashMap<String, Page>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when there is NO entry for `query` yet.
    ///
    /// The name reads the opposite way round; callers treat `true` as "needs fetch".
    pub fn is_cached(&self, query: &str) -> bool {
        !self.entries.contains_key(query)
    }

    /// Appends `hits` to whatever is stored for `query` and records `page`.
    ///
    /// No de-duplication by object id: fetching the same page twice stores its
    /// hits twice.
    #[must_use]
    pub fn apply_page(&self, query: &str, page: u32, hits: Vec<Hit>) -> Self {
        let mut merged = self.hits(query).to_vec();
        merged.extend(hits);

        let mut entries = self.entries.clone();
        entries.insert(query.to_string(), Page { hits: merged, page });
        Self { entries }
    }

    /// Drops the hit with `object_id` from `query`'s entry, keeping order and page.
    /// Missing query or id is a no-op.
    #[must_use]
    pub fn remove_hit(&self, query: &str, object_id: &str) -> Self {
        let Some(existing) = self.entries.get(query) else {
            return self.clone();
        };

        let hits = existing
            .hits
            .iter()
            .filter(|hit| hit.object_id != object_id)
            .cloned()
            .collect();

        let mut entries = self.entries.clone();
        entries.insert(
            query.to_string(),
            Page {
                hits,
                page: existing.page,
            },
        );
        Self { entries }
    }

    pub fn get(&self, query: &str) -> Option<&Page> {
        self.entries.get(query)
    }

    pub fn hits(&self, query: &str) -> &[Hit] {
        self.entries
            .get(query)
            .map(|entry| entry.hits.as_slice())
            .unwrap_or(&[])
    }

    /// Last fetched page for `query`, 0 when nothing was fetched.
    pub fn page(&self, query: &str) -> u32 {
        self.entries.get(query).map(|entry| entry.page).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
