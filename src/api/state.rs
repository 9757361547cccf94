use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::{CatalogApi, HttpCatalog, TmdbWatchProviders, WatchProviderSource},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wait per region before a page is sent with that region still loading
pub const DEFAULT_RENDER_DEADLINE: Duration = Duration::from_millis(1500);

/// Shared application state.
///
/// Read-only after startup: configuration and upstream clients. Nothing here is
/// mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub providers: Arc<dyn WatchProviderSource>,
    /// Region key read from watch-provider results
    pub watch_region: Arc<str>,
    pub image_base_url: Arc<str>,
    /// Per-region wait for full page renders; region fragments wait indefinitely
    pub render_deadline: Duration,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        providers: Arc<dyn WatchProviderSource>,
        watch_region: &str,
        image_base_url: &str,
    ) -> Self {
        Self {
            catalog,
            providers,
            watch_region: Arc::from(watch_region),
            image_base_url: Arc::from(image_base_url),
            render_deadline: DEFAULT_RENDER_DEADLINE,
        }
    }

    pub fn with_render_deadline(mut self, render_deadline: Duration) -> Self {
        self.render_deadline = render_deadline;
        self
    }

    /// Builds the HTTP-backed clients described by `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        let catalog = HttpCatalog::new(http_client.clone(), &config.catalog_api_url)?;
        let providers = TmdbWatchProviders::new(
            http_client,
            config.tmdb_api_key.clone(),
            &config.tmdb_api_url,
        )?;

        tracing::info!(
            provider = providers.name(),
            region = %config.watch_region,
            render_deadline_ms = config.render_deadline_ms,
            "Watch provider source configured"
        );

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(providers),
            &config.watch_region,
            &config.image_base_url,
        )
        .with_render_deadline(Duration::from_millis(config.render_deadline_ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_from_config() {
        let state = AppState::from_config(&test_config(
            "https://api.themoviedb.org/3",
            "http://127.0.0.1:5000",
        ))
        .unwrap();
        assert_eq!(&*state.watch_region, "AR");
        assert_eq!(state.providers.name(), "tmdb");
        assert_eq!(state.render_deadline, Duration::from_millis(1500));
    }

    #[test]
    fn test_from_config_rejects_bad_catalog_url() {
        assert!(AppState::from_config(&test_config("https://api.themoviedb.org/3", "::")).is_err());
    }
}
