use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::model::{RecipeSummary, SearchMode, SearchRequest};
use crate::FinderError;

/// What the result view renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub mode: SearchMode,
    /// `None` until the first search completes
    pub results: Option<Vec<RecipeSummary>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl SearchState {
    /// A search completed and matched nothing.
    pub fn has_no_results(&self) -> bool {
        matches!(&self.results, Some(results) if results.is_empty())
    }

    /// Current results, empty before the first search.
    pub fn results(&self) -> &[RecipeSummary] {
        self.results.as_deref().unwrap_or_default()
    }
}

/// Sequence number handed out when a request is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Holds the [`SearchState`] and publishes every change
///
/// Only the most recently issued request may write results. Responses that
/// arrive for an older ticket are dropped.
#[derive(Debug)]
pub struct ResultStore {
    state: watch::Sender<SearchState>,
    latest: AtomicU64,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            state,
            latest: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn set_mode(&self, mode: SearchMode) {
        self.state.send_if_modified(|state| {
            if state.mode == mode {
                return false;
            }
            state.mode = mode;
            true
        });
    }

    /// Record a keystroke and return the mode the search will run under.
    ///
    /// Clears the error message and raises the loading flag right away for a
    /// non-empty term, before any request is made.
    pub fn record_input(&self, term: &str) -> SearchMode {
        let mut mode = SearchMode::default();
        self.state.send_modify(|state| {
            state.query = term.to_string();
            state.error_message = None;
            if !term.is_empty() {
                state.is_loading = true;
            }
            mode = state.mode;
        });
        mode
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error_message.take().is_some());
    }

    pub fn set_error(&self, error: &FinderError) {
        let message = error.user_message();
        self.state.send_modify(|state| state.error_message = Some(message));
    }

    /// Start `request`. Every earlier ticket becomes stale.
    pub fn issue(&self, request: &SearchRequest) -> RequestTicket {
        let ticket = RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        if request.shows_loading() {
            self.state.send_modify(|state| state.is_loading = true);
        }
        ticket
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// Success replaces the result list; failure stores the error message and
    /// empties it. Either way loading ends. Returns `false` when the ticket is
    /// stale and nothing changed.
    pub fn complete(
        &self,
        ticket: RequestTicket,
        outcome: Result<Vec<RecipeSummary>, FinderError>,
    ) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            match &outcome {
                Ok(results) => state.results = Some(results.clone()),
                Err(e) => {
                    state.error_message = Some(e.user_message());
                    state.results = Some(Vec::new());
                }
            }
            state.is_loading = false;
            true
        });

        if !applied {
            debug!("Dropping response for stale request #{}", ticket.0);
        } else if let Err(e) = &outcome {
            warn!("Search request #{} failed: {}", ticket.0, e);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(term: &str) -> SearchRequest {
        SearchRequest::Text(term.to_string())
    }

    fn meal(id: &str) -> RecipeSummary {
        RecipeSummary {
            id: id.to_string(),
            name: format!("Meal {id}"),
            thumbnail_url: String::new(),
        }
    }

    #[test]
    fn test_input_sets_loading_only_for_non_empty_term() {
        let store = ResultStore::new();

        store.record_input("");
        assert!(!store.snapshot().is_loading);

        store.record_input("chi");
        let state = store.snapshot();
        assert!(state.is_loading);
        assert_eq!(state.query, "chi");
    }

    #[test]
    fn test_input_clears_error() {
        let store = ResultStore::new();
        store.set_error(&FinderError::NotFound("1".to_string()));
        assert!(store.snapshot().error_message.is_some());

        store.record_input("x");
        assert_eq!(store.snapshot().error_message, None);
    }

    #[test]
    fn test_complete_success() {
        let store = ResultStore::new();
        let ticket = store.issue(&search("chicken"));
        assert!(store.snapshot().is_loading);

        assert!(store.complete(ticket, Ok(vec![meal("1"), meal("2")])));
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.results().len(), 2);
        assert!(!state.has_no_results());
    }

    #[test]
    fn test_complete_failure_resets_results() {
        let store = ResultStore::new();
        let ticket = store.issue(&search("chicken"));
        store.complete(ticket, Ok(vec![meal("1")]));

        let ticket = store.issue(&search("chicken"));
        store.complete(ticket, Err(FinderError::malformed("filter.php", "bad")));

        let state = store.snapshot();
        assert_eq!(state.results, Some(Vec::new()));
        assert!(state.has_no_results());
        assert!(!state.is_loading);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Malformed response from filter.php: bad")
        );
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let store = ResultStore::new();
        let older = store.issue(&search("chicken"));
        let newer = store.issue(&search("chicken"));

        assert!(store.complete(newer, Ok(vec![meal("new")])));
        assert!(!store.complete(older, Ok(vec![meal("old")])));

        let state = store.snapshot();
        assert_eq!(state.results(), &[meal("new")]);
    }

    #[test]
    fn test_stale_response_keeps_loading_for_newer_request() {
        let store = ResultStore::new();
        let older = store.issue(&search("chicken"));
        let _newer = store.issue(&search("chicken"));

        assert!(!store.complete(older, Err(FinderError::NotFound("x".to_string()))));
        let state = store.snapshot();
        assert!(state.is_loading);
        assert_eq!(state.error_message, None);
        assert_eq!(state.results, None);
    }

    #[tokio::test]
    async fn test_subscribers_see_completion() {
        let store = ResultStore::new();
        let mut rx = store.subscribe();

        let ticket = store.issue(&search("chicken"));
        store.complete(ticket, Ok(vec![meal("1")]));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().results().len(), 1);
    }

    #[test]
    fn test_empty_text_request_does_not_raise_loading() {
        let store = ResultStore::new();
        let older = store.issue(&search("chi"));
        store.complete(older, Ok(vec![meal("1")]));

        let quiet = store.issue(&search(""));
        assert!(!store.snapshot().is_loading);
        assert!(!store.is_current(older));

        assert!(store.complete(quiet, Ok(Vec::new())));
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert!(state.has_no_results());

        store.issue(&SearchRequest::Random);
        assert!(store.snapshot().is_loading);
    }
}
