//! TMDB watch-provider source
//!
//! API Flow: `GET {api_url}/movie/{id}/watch/providers?api_key=…` returns a document
//! keyed by region. The key stays on this side of the proxy.
use axum::body::Bytes;
use reqwest::Client as HttpClient;
use serde::de::IgnoredAny;
use tracing::instrument;
use url::Url;

use crate::{
    error::{AppError, AppResult},
    services::providers::WatchProviderSource,
};

#[derive(Clone)]
pub struct TmdbWatchProviders {
    http_client: HttpClient,
    api_key: String,
    api_url: Url,
}

impl TmdbWatchProviders {
    pub fn new(http_client: HttpClient, api_key: String, api_url: &str) -> AppResult<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| AppError::Config(format!("invalid TMDB API URL {:?}: {}", api_url, e)))?;

        if api_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "TMDB API URL cannot be a base: {}",
                api_url
            )));
        }

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Builds `{api_url}/movie/{id}/watch/providers`, encoding the id as one segment
    fn endpoint(&self, movie_id: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["movie", movie_id, "watch", "providers"]);
        }
        url
    }
}

#[async_trait::async_trait]
impl WatchProviderSource for TmdbWatchProviders {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn fetch_raw(&self, movie_id: &str) -> AppResult<Bytes> {
        let url = self.endpoint(movie_id);

        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ProviderLookup(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ProviderLookup(format!(
                "TMDB API returned status {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            AppError::ProviderLookup(format!("failed to read body: {}", e.without_url()))
        })?;

        // Relayed verbatim, so only check that it is JSON at all.
        serde_json::from_slice::<IgnoredAny>(&body)
            .map_err(|e| AppError::ProviderLookup(format!("non-JSON body: {}", e)))?;

        tracing::debug!(
            movie_id = %movie_id,
            bytes = body.len(),
            "Watch providers fetched"
        );

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> TmdbWatchProviders {
        TmdbWatchProviders::new(
            reqwest::Client::new(),
            "test_key".to_string(),
            &format!("{}/3", server.uri()),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_id() {
        let provider = TmdbWatchProviders::new(
            reqwest::Client::new(),
            "k".to_string(),
            "https://api.themoviedb.org/3/",
        )
        .unwrap();

        assert_eq!(
            provider.endpoint("157336").as_str(),
            "https://api.themoviedb.org/3/movie/157336/watch/providers"
        );
        assert_eq!(
            provider.endpoint("../../admin").as_str(),
            "https://api.themoviedb.org/3/movie/..%2F..%2Fadmin/watch/providers"
        );
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(TmdbWatchProviders::new(reqwest::Client::new(), "k".to_string(), "nope").is_err());
        assert!(
            TmdbWatchProviders::new(reqwest::Client::new(), "k".to_string(), "mailto:a@b").is_err()
        );
    }

    #[tokio::test]
    async fn test_fetch_raw_relays_body_verbatim() {
        let server = MockServer::start().await;
        let body = "{\"id\":157336,  \"results\":{\"AR\":{\"link\":\"x\"}}}\n";

        Mock::given(method("GET"))
            .and(path("/3/movie/157336/watch/providers"))
            .and(query_param("api_key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let raw = provider_for(&server).fetch_raw("157336").await.unwrap();
        assert_eq!(raw.as_ref(), body.as_bytes());
    }

    #[tokio::test]
    async fn test_fetch_raw_upstream_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"status_code":7,"status_message":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_raw("1").await.unwrap_err();
        assert!(matches!(err, AppError::ProviderLookup(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_fetch_raw_non_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_raw("1").await.unwrap_err();
        assert!(matches!(err, AppError::ProviderLookup(_)));
    }

    #[tokio::test]
    async fn test_fetch_raw_network_error_hides_key() {
        let provider = TmdbWatchProviders::new(
            reqwest::Client::new(),
            "secret_key".to_string(),
            "http://127.0.0.1:9",
        )
        .unwrap();

        let err = provider.fetch_raw("1").await.unwrap_err();
        assert!(matches!(err, AppError::ProviderLookup(_)));
        assert!(!err.to_string().contains("secret_key"));
    }
}
