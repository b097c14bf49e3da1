mod client;
mod schema;

pub use client::MealDbClient;
pub use schema::{parse_meals, MealsEnvelope};

use async_trait::async_trait;

use crate::model::{RecipeDetail, RecipeSummary};
use crate::FinderError;

/// The TheMealDB endpoints the finder relies on
///
/// Every list-returning operation yields an empty vector when the API has no
/// match, and fails with [`FinderError::MalformedResponse`] when the payload
/// does not have the expected shape.
#[async_trait]
pub trait MealApi: Send + Sync {
    /// Meals whose name contains `term`
    async fn search_by_name(&self, term: &str) -> Result<Vec<RecipeSummary>, FinderError>;

    /// Meals using the main ingredient `term`
    async fn filter_by_ingredient(&self, term: &str) -> Result<Vec<RecipeSummary>, FinderError>;

    async fn filter_by_category(&self, category: &str)
        -> Result<Vec<RecipeSummary>, FinderError>;

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RecipeSummary>, FinderError>;

    async fn list_categories(&self) -> Result<Vec<String>, FinderError>;

    async fn list_areas(&self) -> Result<Vec<String>, FinderError>;

    /// A single random meal, wrapped in a list like every other search
    async fn random(&self) -> Result<Vec<RecipeSummary>, FinderError>;

    /// Full record for `id`, `None` when the API knows no such meal
    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>, FinderError>;
}
