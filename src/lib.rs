//! Recipe search over the TheMealDB public API.
//!
//! Search by name or ingredient, category or cuisine, browse the results page
//! by page, open a meal's details and keep a locally persisted list of liked
//! meals.
//!
//! ```no_run
//! # use meal_finder::{MealFinder, SearchRequest};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let finder = MealFinder::builder().build()?;
//! let meals = finder
//!     .search(&SearchRequest::Text("chicken".to_string()))
//!     .await?;
//! println!("{} meals", meals.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod builder;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod model;
pub mod pagination;
pub mod search;
pub mod session;

pub use api::{MealApi, MealDbClient};
pub use builder::{MealFinder, MealFinderBuilder};
pub use config::FinderConfig;
pub use debounce::Debouncer;
pub use detail::DetailView;
pub use error::FinderError;
pub use favorites::{FavoritesRepository, FileBackend, KeyValueBackend, LikeOutcome, MemoryBackend};
pub use model::{
    FavoriteEntry, FilterOptions, Ingredient, RecipeDetail, RecipeSummary, SearchMode,
    SearchRequest,
};
pub use pagination::{PageIndicator, Paginator};
pub use search::{SearchDispatcher, SearchState};
pub use session::SearchSession;

/// Search meals by name or ingredient with default settings
///
/// # Example
/// ```no_run
/// # use meal_finder::search_meals;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let meals = search_meals("chicken").await?;
/// # Ok(())
/// # }
/// ```
pub async fn search_meals(term: &str) -> Result<Vec<RecipeSummary>, FinderError> {
    MealFinder::builder()
        .build()?
        .search(&SearchRequest::Text(term.to_string()))
        .await
}

/// Fetch one random meal with default settings
pub async fn random_meal() -> Result<Option<RecipeSummary>, FinderError> {
    let meals = MealFinder::builder()
        .build()?
        .search(&SearchRequest::Random)
        .await?;
    Ok(meals.into_iter().next())
}

/// Look up a meal by id with default settings
pub async fn lookup_meal(id: &str) -> Result<Option<RecipeDetail>, FinderError> {
    MealFinder::builder().build()?.api().lookup(id).await
}
