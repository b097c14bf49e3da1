use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration for the meal finder
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FinderConfig {
    /// Base URL of the TheMealDB JSON API, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Quiet period after the last keystroke before a text search fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Number of cards per page in search results
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Number of cards per page in the liked list
    #[serde(default = "default_liked_page_size")]
    pub liked_page_size: usize,
    /// Directory holding the persisted favorites
    #[serde(default = "default_favorites_dir")]
    pub favorites_dir: PathBuf,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout: default_timeout(),
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
            liked_page_size: default_liked_page_size(),
            favorites_dir: default_favorites_dir(),
        }
    }
}

// Default value functions
fn default_api_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_page_size() -> usize {
    14
}

fn default_liked_page_size() -> usize {
    28
}

fn default_favorites_dir() -> PathBuf {
    PathBuf::from(".meal-finder")
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEAL_FINDER__ prefix
    /// 2. meal-finder.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEAL_FINDER__PAGE_SIZE
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`FinderConfig::load`] for the precedence rules.
pub fn load_config() -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("meal-finder").required(false))
        .add_source(
            Environment::with_prefix("MEAL_FINDER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
