//! Watch-provider data sources
//!
//! A source answers "where can this movie be streamed" for one movie id. The proxy
//! endpoint relays the raw upstream document; the detail view only needs the
//! configured region.
use axum::body::Bytes;

use crate::{
    error::{AppError, AppResult},
    models::{RegionAvailability, WatchProviderResponse},
};

pub mod tmdb;

pub use tmdb::TmdbWatchProviders;

/// Trait for watch-provider lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchProviderSource: Send + Sync {
    /// Fetch the upstream JSON document for a movie, unmodified.
    ///
    /// Fails with `AppError::ProviderLookup` on network errors, non-2xx upstream
    /// statuses and bodies that are not JSON. Never retried, never cached.
    async fn fetch_raw(&self, movie_id: &str) -> AppResult<Bytes>;

    /// Fetch availability for a single region.
    ///
    /// `Ok(None)` means the upstream answered but has no entry for the region.
    async fn fetch_region(
        &self,
        movie_id: &str,
        region: &str,
    ) -> AppResult<Option<RegionAvailability>> {
        let raw = self.fetch_raw(movie_id).await?;
        let response: WatchProviderResponse = serde_json::from_slice(&raw).map_err(|e| {
            AppError::ProviderLookup(format!("unexpected watch provider document: {}", e))
        })?;
        Ok(response.into_region(region))
    }

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
