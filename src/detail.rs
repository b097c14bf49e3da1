use log::{error, warn};

use crate::api::MealApi;
use crate::favorites::FavoritesRepository;
use crate::model::RecipeDetail;

pub const NOT_FOUND_MESSAGE: &str = "Meal not found";
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching meal data";

/// What the detail page shows for one id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loaded { recipe: RecipeDetail, liked: bool },
    NotFound,
    Failed,
}

impl DetailView {
    /// Static text for the error states
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DetailView::Loaded { .. } => None,
            DetailView::NotFound => Some(NOT_FOUND_MESSAGE),
            DetailView::Failed => Some(FETCH_FAILED_MESSAGE),
        }
    }
}

/// Fetch meal `id` and find out whether it is already liked.
///
/// Never retries. If the favorites cannot be read the meal is still shown,
/// as not liked.
pub async fn load_detail(
    api: &dyn MealApi,
    favorites: &FavoritesRepository,
    id: &str,
) -> DetailView {
    let recipe = match api.lookup(id).await {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return DetailView::NotFound,
        Err(e) => {
            error!("Failed to load meal {}: {}", id, e);
            return DetailView::Failed;
        }
    };

    let liked = favorites.contains(recipe.id()).await.unwrap_or_else(|e| {
        warn!("Could not read favorites: {}", e);
        false
    });

    DetailView::Loaded { recipe, liked }
}
