use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// TheMealDB returns at most this many ingredient slots per meal.
pub const MAX_INGREDIENTS: usize = 20;

const STEP_MARKER: &str = "STEP";
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Minimal displayable meal record
///
/// Serialized with TheMealDB field names so the persisted favorites list
/// stays readable by anything that understands the API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail_url: String,
}

/// Entry of the liked list; a summary reduced to the persisted fields.
pub type FavoriteEntry = RecipeSummary;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One line of a meal's ingredient list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    /// Free-form quantity, empty when the API gives none
    pub measure: String,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.measure.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} - {}", self.name, self.measure)
        }
    }
}

/// Full meal as returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub summary: RecipeSummary,
    pub category: Option<String>,
    pub area: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
    pub source_url: Option<String>,
}

impl RecipeDetail {
    /// Build a detail record from a raw meal object.
    ///
    /// Returns `None` when the object carries no `idMeal`.
    pub fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let id = text_field(fields, "idMeal")?;

        let ingredients = (1..=MAX_INGREDIENTS)
            .filter_map(|slot| {
                let name = text_field(fields, &format!("strIngredient{slot}"))?;
                let measure =
                    text_field(fields, &format!("strMeasure{slot}")).unwrap_or_default();
                Some(Ingredient { name, measure })
            })
            .collect();

        let tags = text_field(fields, "strTags")
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(RecipeDetail {
            summary: RecipeSummary {
                id,
                name: text_field(fields, "strMeal").unwrap_or_default(),
                thumbnail_url: text_field(fields, "strMealThumb").unwrap_or_default(),
            },
            category: text_field(fields, "strCategory"),
            area: text_field(fields, "strArea"),
            ingredients,
            instructions: text_field(fields, "strInstructions").unwrap_or_default(),
            video_url: text_field(fields, "strYoutube"),
            tags,
            source_url: text_field(fields, "strSource"),
        })
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }

    /// Instructions broken into steps.
    ///
    /// Authors who number their steps write `STEP 1 ... STEP 2 ...`; the text
    /// before the first marker is dropped. Without any marker the whole text
    /// is a single step.
    pub fn instruction_steps(&self) -> Vec<String> {
        let steps = self.marked_steps();

        if steps.is_empty() {
            let whole = self.instructions.trim();
            if whole.is_empty() {
                Vec::new()
            } else {
                vec![whole.to_string()]
            }
        } else {
            steps
        }
    }

    /// Whether [`instruction_steps`](Self::instruction_steps) came from
    /// `STEP` markers rather than the whole text.
    pub fn has_numbered_steps(&self) -> bool {
        !self.marked_steps().is_empty()
    }

    fn marked_steps(&self) -> Vec<String> {
        self.instructions
            .split(STEP_MARKER)
            .skip(1)
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(String::from)
            .collect()
    }

    /// Embeddable player URL for the video reference, if it has a `v=` id.
    pub fn video_embed_url(&self) -> Option<String> {
        let url = self.video_url.as_deref()?;
        let (_, rest) = url.split_once("v=")?;
        let video_id = rest.split('&').next().unwrap_or_default();
        if video_id.is_empty() {
            return None;
        }
        Some(format!("{YOUTUBE_EMBED_BASE}{video_id}"))
    }
}

/// Non-empty, trimmed string value of a field. Nulls and blanks are absent.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let value = fields.get(key)?.as_str()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Which endpoint family a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Name search plus ingredient filter
    #[default]
    Text,
    Category,
    /// Cuisine
    Area,
}

/// A concrete request for the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Text(String),
    Category(String),
    Area(String),
    /// "Surprise me"
    Random,
}

impl SearchRequest {
    /// Request for `term` under the given mode.
    pub fn for_mode(mode: SearchMode, term: impl Into<String>) -> Self {
        let term = term.into();
        match mode {
            SearchMode::Text => SearchRequest::Text(term),
            SearchMode::Category => SearchRequest::Category(term),
            SearchMode::Area => SearchRequest::Area(term),
        }
    }

    /// An empty text search runs quietly, without the loading indicator.
    pub fn shows_loading(&self) -> bool {
        !matches!(self, SearchRequest::Text(term) if term.is_empty())
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchRequest::Text(term) => write!(f, "name or ingredient '{term}'"),
            SearchRequest::Category(value) => write!(f, "category '{value}'"),
            SearchRequest::Area(value) => write!(f, "cuisine '{value}'"),
            SearchRequest::Random => write!(f, "a random meal"),
        }
    }
}

/// Values offered by the category and cuisine pickers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub areas: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_summary_accepts_null_thumbnail() {
        let summary: RecipeSummary = serde_json::from_value(json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": null
        }))
        .unwrap();

        assert_eq!(summary.id, "52772");
        assert_eq!(summary.thumbnail_url, "");
    }

    #[test]
    fn test_summary_serializes_with_api_names() {
        let summary = RecipeSummary {
            id: "1".to_string(),
            name: "Soup".to_string(),
            thumbnail_url: "https://img/soup.jpg".to_string(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            json!({"idMeal": "1", "strMeal": "Soup", "strMealThumb": "https://img/soup.jpg"})
        );
    }

    #[test]
    fn test_detail_collects_ingredients_and_skips_blanks() {
        let detail = RecipeDetail::from_fields(&fields(json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "water",
            "strMeasure2": null,
            "strIngredient3": "",
            "strMeasure3": "1 tbsp",
            "strIngredient4": "  ",
            "strIngredient20": "brown sugar",
            "strMeasure20": "1/2 cup ",
            "strTags": "Meat, Casserole,",
            "strYoutube": ""
        })))
        .unwrap();

        assert_eq!(detail.category.as_deref(), Some("Chicken"));
        assert_eq!(detail.area.as_deref(), Some("Japanese"));
        assert_eq!(
            detail.ingredients,
            vec![
                Ingredient {
                    name: "soy sauce".to_string(),
                    measure: "3/4 cup".to_string()
                },
                Ingredient {
                    name: "water".to_string(),
                    measure: String::new()
                },
                Ingredient {
                    name: "brown sugar".to_string(),
                    measure: "1/2 cup".to_string()
                },
            ]
        );
        assert_eq!(detail.tags, vec!["Meat", "Casserole"]);
        assert_eq!(detail.video_url, None);
    }

    #[test]
    fn test_detail_requires_id() {
        assert!(RecipeDetail::from_fields(&fields(json!({"strMeal": "Nameless"}))).is_none());
    }

    #[test]
    fn test_instruction_steps_split_on_marker() {
        let detail = RecipeDetail::from_fields(&fields(json!({
            "idMeal": "1",
            "strInstructions": "Intro text STEP 1\r\nBoil water.\r\nSTEP 2\r\nAdd pasta."
        })))
        .unwrap();

        assert_eq!(
            detail.instruction_steps(),
            vec!["1\r\nBoil water.", "2\r\nAdd pasta."]
        );
        assert!(detail.has_numbered_steps());
    }

    #[test]
    fn test_instruction_steps_without_marker() {
        let detail = RecipeDetail::from_fields(&fields(json!({
            "idMeal": "1",
            "strInstructions": "Mix everything and bake. "
        })))
        .unwrap();

        assert_eq!(detail.instruction_steps(), vec!["Mix everything and bake."]);
        assert!(!detail.has_numbered_steps());
    }

    #[test]
    fn test_blank_markers_fall_back_to_unnumbered_text() {
        let detail = RecipeDetail::from_fields(&fields(json!({
            "idMeal": "1",
            "strInstructions": "Serve cold. STEP  STEP "
        })))
        .unwrap();

        assert!(!detail.has_numbered_steps());
        assert_eq!(detail.instruction_steps(), vec!["Serve cold. STEP  STEP"]);
    }

    #[test]
    fn test_video_embed_url() {
        let mut detail = RecipeDetail::from_fields(&fields(json!({
            "idMeal": "1",
            "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s&t=10"
        })))
        .unwrap();
        assert_eq!(
            detail.video_embed_url().as_deref(),
            Some("https://www.youtube.com/embed/4aZr5hZXP_s")
        );

        detail.video_url = Some("https://vimeo.com/12345".to_string());
        assert_eq!(detail.video_embed_url(), None);
    }

    #[test]
    fn test_request_for_mode() {
        assert_eq!(
            SearchRequest::for_mode(SearchMode::Area, "Italian"),
            SearchRequest::Area("Italian".to_string())
        );
        assert_eq!(
            SearchRequest::for_mode(SearchMode::default(), "chicken"),
            SearchRequest::Text("chicken".to_string())
        );
    }
}
