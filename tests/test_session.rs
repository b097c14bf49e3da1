use async_trait::async_trait;
use meal_finder::{
    FinderError, MealApi, MealFinder, MemoryBackend, RecipeDetail, RecipeSummary, SearchMode,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Answers every search with one meal named after the term, after an
/// optional per-term delay, and records each call it receives.
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<String>>,
    latency: HashMap<String, Duration>,
    fail_areas: bool,
}

impl FakeApi {
    fn with_latency(entries: &[(&str, u64)]) -> Self {
        Self {
            latency: entries
                .iter()
                .map(|(term, ms)| (term.to_string(), Duration::from_millis(*ms)))
                .collect(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, call: String, term: &str) -> Vec<RecipeSummary> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.latency.get(term) {
            sleep(*delay).await;
        }
        vec![RecipeSummary {
            id: format!("id-{term}"),
            name: term.to_string(),
            thumbnail_url: String::new(),
        }]
    }
}

#[async_trait]
impl MealApi for FakeApi {
    async fn search_by_name(&self, term: &str) -> Result<Vec<RecipeSummary>, FinderError> {
        Ok(self.answer(format!("name:{term}"), term).await)
    }

    async fn filter_by_ingredient(&self, term: &str) -> Result<Vec<RecipeSummary>, FinderError> {
        // Same id as the name search, so merging must collapse them
        Ok(self.answer(format!("ingredient:{term}"), term).await)
    }

    async fn filter_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<RecipeSummary>, FinderError> {
        if category == "Broken" {
            return Err(FinderError::MalformedResponse {
                endpoint: "filter.php".to_string(),
                message: "unexpected shape".to_string(),
            });
        }
        Ok(self.answer(format!("category:{category}"), category).await)
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RecipeSummary>, FinderError> {
        Ok(self.answer(format!("area:{area}"), area).await)
    }

    async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
        Ok(vec!["Beef".to_string(), "Dessert".to_string()])
    }

    async fn list_areas(&self) -> Result<Vec<String>, FinderError> {
        if self.fail_areas {
            return Err(FinderError::NotFound("areas".to_string()));
        }
        Ok(vec!["Italian".to_string()])
    }

    async fn random(&self) -> Result<Vec<RecipeSummary>, FinderError> {
        Ok(self.answer("random".to_string(), "random").await)
    }

    async fn lookup(&self, _id: &str) -> Result<Option<RecipeDetail>, FinderError> {
        Ok(None)
    }
}

fn finder_with(api: Arc<FakeApi>) -> MealFinder {
    MealFinder::builder()
        .api(api)
        .favorites_backend(Arc::new(MemoryBackend::new()))
        .debounce(Duration::from_millis(500))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_loading_is_set_before_debounce_elapses() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api.clone()).session();

    let handle = session.input("chicken");
    let state = session.state();
    assert!(state.is_loading);
    assert_eq!(state.query, "chicken");
    assert!(api.calls().is_empty());

    assert!(handle.await.unwrap());
    assert!(!session.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_does_not_raise_loading() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api.clone()).session();

    let handle = session.input("");
    assert!(!session.state().is_loading);

    // Still dispatched once the delay passes
    assert!(handle.await.unwrap());
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_input_only_searches_last_term() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api.clone()).session();

    let first = session.input("chi");
    sleep(Duration::from_millis(200)).await;
    let second = session.input("chicken");

    assert!(!first.await.unwrap());
    assert!(second.await.unwrap());

    let mut calls = api.calls();
    calls.sort();
    assert_eq!(calls, vec!["ingredient:chicken", "name:chicken"]);

    let state = session.state();
    assert_eq!(state.results().len(), 1);
    assert_eq!(state.results()[0].id, "id-chicken");
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_does_not_overwrite_newer_results() {
    let api = Arc::new(FakeApi::with_latency(&[("slow", 1_000), ("fast", 10)]));
    let session = finder_with(api.clone()).session();

    // "slow" fires at 500ms and answers at 1500ms
    let slow = session.input("slow");
    sleep(Duration::from_millis(600)).await;
    // "fast" fires at 1100ms and answers at 1110ms
    let fast = session.input("fast");

    assert!(fast.await.unwrap());
    assert_eq!(session.state().results()[0].name, "fast");

    assert!(slow.await.unwrap());
    let state = session.state();
    assert_eq!(state.results().len(), 1);
    assert_eq!(state.results()[0].name, "fast");
    assert!(!state.is_loading);
    assert!(api.calls().contains(&"name:slow".to_string()));
}

#[tokio::test]
async fn test_filter_selection_uses_current_mode() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api.clone()).session();

    session.set_mode(SearchMode::Area);
    session.select_filter("Italian").await;
    session.select_filter("").await;

    assert_eq!(api.calls(), vec!["area:Italian"]);
    assert_eq!(session.state().mode, SearchMode::Area);
    assert_eq!(session.state().results()[0].name, "Italian");
}

#[tokio::test]
async fn test_whitespace_filter_is_searched_as_given() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api.clone()).session();

    session.set_mode(SearchMode::Category);
    session.select_filter(" ").await;

    assert_eq!(api.calls(), vec!["category: "]);
}

#[tokio::test(start_paused = true)]
async fn test_last_input_reaches_subscriber_after_session_drops() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api).session();
    let mut updates = session.subscribe();

    let pending = session.input("chicken");
    assert!(pending.await.unwrap());
    drop(session);

    let mut last = None;
    while updates.changed().await.is_ok() {
        last = Some(updates.borrow_and_update().clone());
    }
    let last = last.expect("final state was published");
    assert!(!last.is_loading);
    assert_eq!(last.results()[0].id, "id-chicken");
}

#[tokio::test]
async fn test_failed_search_sets_error_and_empties_results() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api).session();

    session.set_mode(SearchMode::Category);
    session.select_filter("Seafood").await;
    assert_eq!(session.state().results().len(), 1);

    session.select_filter("Broken").await;
    let state = session.state();
    assert!(state.has_no_results());
    assert!(!state.is_loading);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Malformed response from filter.php: unexpected shape")
    );
}

#[tokio::test]
async fn test_surprise_me_clears_previous_error() {
    let api = Arc::new(FakeApi::default());
    let session = finder_with(api).session();

    session.set_mode(SearchMode::Category);
    session.select_filter("Broken").await;
    assert!(session.state().error_message.is_some());

    session.surprise_me().await;
    let state = session.state();
    assert_eq!(state.error_message, None);
    assert_eq!(state.results()[0].id, "id-random");
}

#[tokio::test]
async fn test_filter_options_failure_is_reported() {
    let api = Arc::new(FakeApi {
        fail_areas: true,
        ..Default::default()
    });
    let session = finder_with(api).session();

    let options = session.load_filter_options().await;

    assert_eq!(options.categories, vec!["Beef", "Dessert"]);
    assert!(options.areas.is_empty());
    assert_eq!(
        session.state().error_message.as_deref(),
        Some("Meal not found: areas")
    );
}
