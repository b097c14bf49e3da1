use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

use super::schema::{parse_meals, AreaRow, CategoryRow};
use super::MealApi;
use crate::model::{RecipeDetail, RecipeSummary};
use crate::FinderError;

const USER_AGENT: &str = concat!("meal-finder/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the TheMealDB JSON API
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FinderError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_meals<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FinderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_meals(endpoint, &body)
    }
}

#[async_trait]
impl MealApi for MealDbClient {
    async fn search_by_name(&self, term: &str) -> Result<Vec<RecipeSummary>, FinderError> {
        self.get_meals("search.php", &[("s", term)]).await
    }

    async fn filter_by_ingredient(&self, term: &str) -> Result<Vec<RecipeSummary>, FinderError> {
        self.get_meals("filter.php", &[("i", term)]).await
    }

    async fn filter_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<RecipeSummary>, FinderError> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RecipeSummary>, FinderError> {
        self.get_meals("filter.php", &[("a", area)]).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
        let rows: Vec<CategoryRow> = self.get_meals("list.php", &[("c", "list")]).await?;
        Ok(rows.into_iter().map(|row| row.name).collect())
    }

    async fn list_areas(&self) -> Result<Vec<String>, FinderError> {
        let rows: Vec<AreaRow> = self.get_meals("list.php", &[("a", "list")]).await?;
        Ok(rows.into_iter().map(|row| row.name).collect())
    }

    async fn random(&self) -> Result<Vec<RecipeSummary>, FinderError> {
        self.get_meals("random.php", &[]).await
    }

    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>, FinderError> {
        let meals: Vec<Map<String, Value>> = self.get_meals("lookup.php", &[("i", id)]).await?;

        match meals.first() {
            Some(fields) => RecipeDetail::from_fields(fields)
                .map(Some)
                .ok_or_else(|| FinderError::malformed("lookup.php", "meal without idMeal")),
            None => Ok(None),
        }
    }
}
