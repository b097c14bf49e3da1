use thiserror::Error;

/// Message shown when an error has nothing better to say.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Errors that can occur while searching, looking up or liking meals
#[derive(Error, Debug)]
pub enum FinderError {
    /// Transport failure or non-success HTTP status
    #[error("Failed to fetch: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The API answered with a body that does not match the endpoint's schema
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// No meal exists for the requested id
    #[error("Meal not found: {0}")]
    NotFound(String),

    /// Reading or writing the favorites backend failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// Encoding the favorites list failed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl FinderError {
    pub(crate) fn malformed(endpoint: &str, message: impl Into<String>) -> Self {
        FinderError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// Text surfaced to the user when a search fails.
    ///
    /// Falls back to [`GENERIC_ERROR_MESSAGE`] when the error renders empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}
