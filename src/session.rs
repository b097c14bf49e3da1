use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::debounce::Debouncer;
use crate::model::{FilterOptions, SearchMode, SearchRequest};
use crate::search::{ResultStore, SearchDispatcher, SearchState};

/// Interactive search: keystrokes in, a stream of [`SearchState`] out
///
/// Text input is debounced; picking a category or cuisine and "surprise me"
/// run immediately. All paths share one [`ResultStore`], so whichever request
/// was issued last owns the results.
pub struct SearchSession {
    dispatcher: SearchDispatcher,
    store: Arc<ResultStore>,
    debouncer: Debouncer,
}

impl SearchSession {
    pub fn new(dispatcher: SearchDispatcher, debounce: Duration) -> Self {
        Self {
            dispatcher,
            store: Arc::new(ResultStore::new()),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn state(&self) -> SearchState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.store.subscribe()
    }

    pub fn set_mode(&self, mode: SearchMode) {
        self.store.set_mode(mode);
    }

    /// Handle the search box changing to `term`.
    ///
    /// The request is built with the mode active now and fires once input
    /// has been quiet for the debounce delay. Empty terms are dispatched too.
    pub fn input(&self, term: &str) -> JoinHandle<bool> {
        let mode = self.store.record_input(term);
        let request = SearchRequest::for_mode(mode, term);
        let dispatcher = self.dispatcher.clone();
        let store = Arc::clone(&self.store);

        self.debouncer
            .call(move || async move { run(&dispatcher, &store, request).await })
    }

    /// Handle a category or cuisine being picked. An empty pick is ignored;
    /// any other value is searched as given.
    pub async fn select_filter(&self, value: &str) {
        if value.is_empty() {
            debug!("Ignoring empty filter selection");
            return;
        }
        let request = SearchRequest::for_mode(self.store.snapshot().mode, value);
        run(&self.dispatcher, &self.store, request).await;
    }

    pub async fn surprise_me(&self) {
        self.store.clear_error();
        run(&self.dispatcher, &self.store, SearchRequest::Random).await;
    }

    /// Load the category and cuisine pickers.
    ///
    /// A failed listing leaves its list empty and surfaces the error.
    pub async fn load_filter_options(&self) -> FilterOptions {
        let api = self.dispatcher.api();
        let (categories, areas) = tokio::join!(api.list_categories(), api.list_areas());

        let categories = categories.unwrap_or_else(|e| {
            warn!("Failed to list categories: {}", e);
            self.store.set_error(&e);
            Vec::new()
        });
        let areas = areas.unwrap_or_else(|e| {
            warn!("Failed to list cuisines: {}", e);
            self.store.set_error(&e);
            Vec::new()
        });

        FilterOptions { categories, areas }
    }
}

async fn run(dispatcher: &SearchDispatcher, store: &ResultStore, request: SearchRequest) {
    let ticket = store.issue(&request);
    let outcome = dispatcher.dispatch(&request).await;
    store.complete(ticket, outcome);
}
