mod store;

pub use store::{RequestTicket, ResultStore, SearchState};

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::MealApi;
use crate::model::{RecipeSummary, SearchRequest};
use crate::FinderError;

/// Turns a [`SearchRequest`] into API calls and a single result list
#[derive(Clone)]
pub struct SearchDispatcher {
    api: Arc<dyn MealApi>,
}

impl SearchDispatcher {
    pub fn new(api: Arc<dyn MealApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn MealApi> {
        &self.api
    }

    /// Run `request` against the API.
    ///
    /// Text searches query the name search and the ingredient filter
    /// concurrently and merge both lists without duplicate ids. A failure of
    /// either request fails the whole search.
    pub async fn dispatch(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<RecipeSummary>, FinderError> {
        debug!("Dispatching search for {}", request);

        let results = match request {
            SearchRequest::Text(term) => {
                let (by_name, by_ingredient) = tokio::try_join!(
                    self.api.search_by_name(term),
                    self.api.filter_by_ingredient(term)
                )?;
                debug!(
                    "'{}' matched {} by name and {} by ingredient",
                    term,
                    by_name.len(),
                    by_ingredient.len()
                );
                merge_unique(by_name, by_ingredient)
            }
            SearchRequest::Category(category) => self.api.filter_by_category(category).await?,
            SearchRequest::Area(area) => self.api.filter_by_area(area).await?,
            SearchRequest::Random => self.api.random().await?,
        };

        info!("Search for {} returned {} meals", request, results.len());
        Ok(results)
    }
}

/// Concatenate `first` and `second`, keeping one entry per id.
///
/// An id keeps the position of its first occurrence and the value of its
/// last one.
pub fn merge_unique(first: Vec<RecipeSummary>, second: Vec<RecipeSummary>) -> Vec<RecipeSummary> {
    let mut merged: Vec<RecipeSummary> = Vec::with_capacity(first.len() + second.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for meal in first.into_iter().chain(second) {
        match positions.get(&meal.id) {
            Some(&index) => merged[index] = meal,
            None => {
                positions.insert(meal.id.clone(), merged.len());
                merged.push(meal);
            }
        }
    }

    merged
}
