use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::FinderError;

/// Body shape shared by every endpoint: `{ "meals": [...] | null }`
#[derive(Debug, Deserialize)]
pub struct MealsEnvelope<T> {
    pub meals: Option<Vec<T>>,
}

/// Row of `list.php?c=list`
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRow {
    #[serde(rename = "strCategory")]
    pub name: String,
}

/// Row of `list.php?a=list`
#[derive(Debug, Deserialize)]
pub(crate) struct AreaRow {
    #[serde(rename = "strArea")]
    pub name: String,
}

/// Parse an endpoint body into its list of meals.
///
/// A missing or `null` `meals` field means "no match" and yields an empty
/// list. Anything else that does not fit `T` is a malformed response.
pub fn parse_meals<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<Vec<T>, FinderError> {
    let envelope: MealsEnvelope<T> =
        serde_json::from_str(body).map_err(|e| FinderError::malformed(endpoint, e.to_string()))?;
    Ok(envelope.meals.unwrap_or_default())
}
