use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{MealApi, MealDbClient};
use crate::detail::{load_detail, DetailView};
use crate::favorites::{FavoritesRepository, FileBackend, KeyValueBackend, LikeOutcome};
use crate::model::{FavoriteEntry, FilterOptions, RecipeSummary, SearchRequest};
use crate::search::SearchDispatcher;
use crate::session::SearchSession;
use crate::{FinderConfig, FinderError};

/// Where the liked list lives
#[derive(Clone)]
enum FavoritesSource {
    /// `liked.json` inside this directory
    Directory(PathBuf),
    /// A caller-provided backend
    Backend(Arc<dyn KeyValueBackend>),
}

/// Builder for configuring a [`MealFinder`]
#[derive(Default)]
pub struct MealFinderBuilder {
    config: Option<FinderConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    debounce: Option<Duration>,
    page_size: Option<usize>,
    liked_page_size: Option<usize>,
    favorites: Option<FavoritesSource>,
    api: Option<Arc<dyn MealApi>>,
}

impl MealFinderBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// Options set on the builder still take precedence.
    pub fn config(mut self, config: FinderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API base URL
    ///
    /// # Example
    /// ```
    /// use meal_finder::MealFinder;
    ///
    /// let builder = MealFinder::builder()
    ///     .base_url("http://localhost:8080/api/json/v1/1");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use meal_finder::MealFinder;
    /// use std::time::Duration;
    ///
    /// let builder = MealFinder::builder().timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Quiet period before a typed search fires
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = Some(delay);
        self
    }

    /// Cards per page of search results
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Cards per page of the liked list
    pub fn liked_page_size(mut self, size: usize) -> Self {
        self.liked_page_size = Some(size);
        self
    }

    /// Persist favorites as `liked.json` under `dir`
    pub fn favorites_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.favorites = Some(FavoritesSource::Directory(dir.into()));
        self
    }

    /// Persist favorites in a custom backend
    ///
    /// # Example
    /// ```
    /// use meal_finder::{MealFinder, MemoryBackend};
    /// use std::sync::Arc;
    ///
    /// let builder = MealFinder::builder()
    ///     .favorites_backend(Arc::new(MemoryBackend::new()));
    /// ```
    pub fn favorites_backend(mut self, backend: Arc<dyn KeyValueBackend>) -> Self {
        self.favorites = Some(FavoritesSource::Backend(backend));
        self
    }

    /// Use `api` instead of the HTTP client
    ///
    /// `base_url` and `timeout` have no effect when this is set.
    pub fn api(mut self, api: Arc<dyn MealApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Build the finder
    ///
    /// # Errors
    /// Returns `FinderError` if:
    /// - A page size is zero
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<MealFinder, FinderError> {
        let config = self.config.unwrap_or_default();

        let page_size = non_zero(self.page_size.unwrap_or(config.page_size), "page_size")?;
        let liked_page_size = non_zero(
            self.liked_page_size.unwrap_or(config.liked_page_size),
            "liked_page_size",
        )?;

        let api: Arc<dyn MealApi> = match self.api {
            Some(api) => api,
            None => {
                let base_url = self.base_url.unwrap_or(config.api_base_url);
                let timeout = self
                    .timeout
                    .unwrap_or(Duration::from_secs(config.timeout));
                Arc::new(MealDbClient::new(base_url, Some(timeout))?)
            }
        };

        let backend: Arc<dyn KeyValueBackend> = match self.favorites {
            Some(FavoritesSource::Backend(backend)) => backend,
            Some(FavoritesSource::Directory(dir)) => Arc::new(FileBackend::new(dir)),
            None => Arc::new(FileBackend::new(config.favorites_dir)),
        };

        Ok(MealFinder {
            dispatcher: SearchDispatcher::new(api),
            favorites: FavoritesRepository::new(backend),
            debounce: self
                .debounce
                .unwrap_or(Duration::from_millis(config.debounce_ms)),
            page_size,
            liked_page_size,
        })
    }
}

fn non_zero(size: usize, name: &str) -> Result<NonZeroUsize, FinderError> {
    NonZeroUsize::new(size)
        .ok_or_else(|| FinderError::BuilderError(format!("{} must be greater than zero", name)))
}

/// Entry point tying the API client, search and favorites together
#[derive(Clone)]
pub struct MealFinder {
    dispatcher: SearchDispatcher,
    favorites: FavoritesRepository,
    debounce: Duration,
    page_size: NonZeroUsize,
    liked_page_size: NonZeroUsize,
}

impl MealFinder {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use meal_finder::MealFinder;
    ///
    /// let builder = MealFinder::builder();
    /// ```
    pub fn builder() -> MealFinderBuilder {
        MealFinderBuilder::default()
    }

    pub fn api(&self) -> &Arc<dyn MealApi> {
        self.dispatcher.api()
    }

    pub fn favorites(&self) -> &FavoritesRepository {
        &self.favorites
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn liked_page_size(&self) -> NonZeroUsize {
        self.liked_page_size
    }

    /// A fresh interactive session sharing this finder's API client
    pub fn session(&self) -> SearchSession {
        SearchSession::new(self.dispatcher.clone(), self.debounce)
    }

    /// Run one search without debouncing or state tracking
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<RecipeSummary>, FinderError> {
        self.dispatcher.dispatch(request).await
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, FinderError> {
        let api = self.api();
        let (categories, areas) = tokio::try_join!(api.list_categories(), api.list_areas())?;
        Ok(FilterOptions { categories, areas })
    }

    pub async fn detail(&self, id: &str) -> DetailView {
        load_detail(&**self.api(), &self.favorites, id).await
    }

    /// Look up `id` and toggle its liked state
    ///
    /// # Errors
    /// `FinderError::NotFound` when no meal has that id.
    pub async fn toggle_like(&self, id: &str) -> Result<(LikeOutcome, RecipeSummary), FinderError> {
        let recipe = self
            .api()
            .lookup(id)
            .await?
            .ok_or_else(|| FinderError::NotFound(id.to_string()))?;

        let outcome = self.favorites.toggle(&recipe.summary).await?;
        Ok((outcome, recipe.summary))
    }

    pub async fn liked(&self) -> Result<Vec<FavoriteEntry>, FinderError> {
        self.favorites.list().await
    }
}
