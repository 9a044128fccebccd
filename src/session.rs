use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cache::ResultCache;
use crate::error::FetchError;
use crate::models::{Hit, Page};

/// Shared "session still open" marker.
///
/// Starts open; `close` is one-way. Background fetches hold a clone and check
/// it before handing back a result.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: String,
    pub page: u32,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<Page, FetchError>,
}

pub struct SessionState {
    pub cache: ResultCache,
    pub active_query: String,
    pub input_text: String,
    pub error: Option<FetchError>,
    pub is_loading: bool,
    liveness: Liveness,
}

impl SessionState {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            cache: ResultCache::new(),
            active_query: String::new(),
            input_text: input_text.into(),
            error: None,
            is_loading: false,
            liveness: Liveness::new(),
        }
    }

    pub fn change_input(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    /// Makes the input the active query. Returns the request to issue when the
    /// query has no cache entry yet; cached queries are shown as they are.
    pub fn submit(&mut self) -> Option<FetchRequest> {
        self.active_query = self.input_text.clone();

        if self.cache.is_cached(&self.active_query) {
            tracing::info!(query = %self.active_query, "submitting new search");
            Some(FetchRequest {
                query: self.active_query.clone(),
                page: 0,
            })
        } else {
            tracing::debug!(query = %self.active_query, "serving search from cache");
            None
        }
    }

    /// Next page for the active query.
    pub fn load_more(&self) -> FetchRequest {
        FetchRequest {
            query: self.active_query.clone(),
            page: self.current_page() + 1,
        }
    }

    /// Marks a request as in flight. Returns `false` once the session is closed.
    pub fn begin_fetch(&mut self, request: &FetchRequest) -> bool {
        if !self.liveness.is_alive() {
            return false;
        }

        tracing::info!(query = %request.query, page = request.page, "fetching search page");
        self.is_loading = true;
        self.error = None;
        true
    }

    /// Folds a finished request into the session. Returns `false` when the
    /// outcome was discarded because the session is closed.
    ///
    /// A failure records the error but leaves `is_loading` set.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if !self.liveness.is_alive() {
            tracing::debug!(query = %outcome.request.query, "session closed, dropping fetch outcome");
            return false;
        }

        let FetchOutcome { request, result } = outcome;
        match result {
            Ok(page) => {
                tracing::debug!(
                    query = %request.query,
                    page = page.page,
                    hits = page.hits.len(),
                    "applying search page"
                );
                self.cache = self.cache.apply_page(&request.query, page.page, page.hits);
                self.is_loading = false;
            }
            Err(err) => {
                tracing::warn!(query = %request.query, page = request.page, "search failed: {err}");
                self.error = Some(err);
            }
        }
        true
    }

    /// Removes one hit from the active query's results.
    pub fn dismiss(&mut self, object_id: &str) {
        tracing::debug!(query = %self.active_query, object_id, "dismissing hit");
        self.cache = self.cache.remove_hit(&self.active_query, object_id);
    }

    pub fn teardown(&mut self) {
        tracing::info!("closing search session");
        self.liveness.close();
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.cache.page(&self.active_query)
    }

    pub fn visible_hits(&self) -> &[Hit] {
        self.cache.hits(&self.active_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hit;

    fn success(query: &str, page: u32, hits: Vec<Hit>) -> FetchOutcome {
        FetchOutcome {
            request: FetchRequest {
                query: query.to_string(),
                page,
            },
            result: Ok(Page { hits, page }),
        }
    }

    fn failure(query: &str, page: u32) -> FetchOutcome {
        FetchOutcome {
            request: FetchRequest {
                query: query.to_string(),
                page,
            },
            result: Err(FetchError::Status(503)),
        }
    }

    #[test]
    fn submit_requests_first_page_for_unseen_query() {
        let mut session = SessionState::new("redux");
        let request = session.submit();

        assert_eq!(session.active_query, "redux");
        assert_eq!(
            request,
            Some(FetchRequest {
                query: "redux".into(),
                page: 0
            })
        );
    }

    #[test]
    fn submit_serves_cached_query_without_request() {
        let mut session = SessionState::new("redux");
        session.submit();
        session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1)]));

        session.change_input("react");
        assert!(session.submit().is_some());

        session.change_input("redux");
        assert_eq!(session.submit(), None);
        assert_eq!(session.active_query, "redux");
        assert_eq!(session.visible_hits().len(), 1);
    }

    #[test]
    fn empty_query_is_submitted_as_is() {
        let mut session = SessionState::new("");
        assert_eq!(session.submit().map(|r| r.query), Some(String::new()));
    }

    #[test]
    fn typing_does_not_change_active_query() {
        let mut session = SessionState::new("redux");
        session.submit();
        session.change_input("rea");
        assert_eq!(session.active_query, "redux");
        assert_eq!(session.input_text, "rea");
    }

    #[test]
    fn load_more_asks_for_page_after_stored_one() {
        let mut session = SessionState::new("redux");
        session.submit();
        assert_eq!(session.load_more().page, 1);

        session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1)]));
        session.apply(success("redux", 1, vec![hit("b", "B", "x", 1, 1)]));
        assert_eq!(session.load_more(), FetchRequest { query: "redux".into(), page: 2 });
    }

    #[test]
    fn successful_fetch_appends_and_clears_loading() {
        let mut session = SessionState::new("redux");
        let request = session.submit().unwrap();
        assert!(session.begin_fetch(&request));
        assert!(session.is_loading);

        session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1)]));
        assert!(!session.is_loading);
        assert_eq!(session.visible_hits()[0].object_id, "a");
    }

    #[test]
    fn outcome_lands_under_the_query_it_was_issued_for() {
        let mut session = SessionState::new("redux");
        session.submit();
        session.change_input("react");
        session.submit();

        session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1)]));
        assert!(session.visible_hits().is_empty());
        assert_eq!(session.cache.hits("redux").len(), 1);
    }

    // Failure keeps the loading flag set; only a later success clears it.
    #[test]
    fn failed_fetch_sets_error_and_keeps_loading() {
        let mut session = SessionState::new("redux");
        let request = session.submit().unwrap();
        session.begin_fetch(&request);
        session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1)]));

        let more = session.load_more();
        session.begin_fetch(&more);
        session.apply(failure("redux", 1));

        assert!(session.error.is_some());
        assert!(session.is_loading);
        assert_eq!(session.visible_hits().len(), 1);
        assert_eq!(session.current_page(), 0);
    }

    #[test]
    fn starting_a_new_fetch_clears_previous_error() {
        let mut session = SessionState::new("redux");
        session.apply(failure("redux", 0));
        assert!(session.error.is_some());

        let request = session.submit().unwrap();
        session.begin_fetch(&request);
        assert!(session.error.is_none());
    }

    #[test]
    fn dismiss_targets_active_query_only() {
        let mut session = SessionState::new("redux");
        session.submit();
        session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1), hit("b", "B", "x", 1, 1)]));
        session.apply(success("react", 0, vec![hit("a", "A", "x", 1, 1)]));

        session.dismiss("a");
        assert_eq!(session.visible_hits().len(), 1);
        assert_eq!(session.visible_hits()[0].object_id, "b");
        assert_eq!(session.cache.hits("react").len(), 1);
    }

    #[test]
    fn outcomes_after_teardown_are_discarded() {
        let mut session = SessionState::new("redux");
        let request = session.submit().unwrap();
        session.begin_fetch(&request);
        let liveness = session.liveness();

        session.teardown();
        assert!(!liveness.is_alive());
        assert!(!session.apply(success("redux", 0, vec![hit("a", "A", "x", 1, 1)])));
        assert!(!session.apply(failure("redux", 0)));
        assert!(session.cache.is_empty());
        assert!(session.error.is_none());
        assert!(!session.begin_fetch(&request));
    }
}
