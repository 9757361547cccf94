//! Catalog backend client
//!
//! The catalog owns the movie dataset, the search index and the recommendation
//! engine. This client only issues `GET`s and decodes the envelopes:
//!
//! - `/api/movies?search=…` → `{ "movies": [...] }`
//! - `/api/movie/{tconst}?lang=…` → a single movie
//! - `/api/recommend?tconst=…` → `{ "recommendations": [...] }`
//! - `/api/default_language` → `{ "default_language": "..." }`
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::{
    error::{AppError, AppResult},
    models::{DefaultLanguageResponse, Locale, Movie, MovieListResponse, RecommendationResponse},
    services::fetch::FetchError,
};

/// Read-only access to the catalog backend
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Free-text search; an empty query asks for the default listing
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError>;

    /// Metadata for one movie in the given interface language
    async fn movie_details(&self, tconst: &str, locale: Locale) -> Result<Movie, FetchError>;

    /// Similar movies, in rank order
    async fn recommendations(&self, tconst: &str) -> Result<Vec<Movie>, FetchError>;

    /// Raw default-language suggestion; validation is the caller's job
    async fn default_language(&self) -> Result<Option<String>, FetchError>;
}

#[derive(Clone)]
pub struct HttpCatalog {
    http_client: HttpClient,
    api_url: Url,
}

impl HttpCatalog {
    pub fn new(http_client: HttpClient, api_url: &str) -> AppResult<Self> {
        let api_url = Url::parse(api_url).map_err(|e| {
            AppError::Config(format!("invalid catalog API URL {:?}: {}", api_url, e))
        })?;

        if api_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "catalog API URL cannot be a base: {}",
                api_url
            )));
        }

        Ok(Self {
            http_client,
            api_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "Catalog request");

        let response = self.http_client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalog {
    // Search terms stay out of spans and events.
    #[instrument(skip(self, query))]
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError> {
        let response: MovieListResponse = self
            .get_json(self.endpoint(&["api", "movies"]), &[("search", query)])
            .await?;

        tracing::info!(results = response.movies.len(), "Movie search completed");

        Ok(response.movies)
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, tconst: &str, locale: Locale) -> Result<Movie, FetchError> {
        self.get_json(
            self.endpoint(&["api", "movie", tconst]),
            &[("lang", locale.code())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn recommendations(&self, tconst: &str) -> Result<Vec<Movie>, FetchError> {
        let response: RecommendationResponse = self
            .get_json(self.endpoint(&["api", "recommend"]), &[("tconst", tconst)])
            .await?;

        tracing::info!(
            tconst = %tconst,
            results = response.recommendations.len(),
            "Recommendations fetched"
        );

        Ok(response.recommendations)
    }

    #[instrument(skip(self))]
    async fn default_language(&self) -> Result<Option<String>, FetchError> {
        let response: DefaultLanguageResponse = self
            .get_json(self.endpoint(&["api", "default_language"]), &[])
            .await?;
        Ok(response.default_language)
    }
}
