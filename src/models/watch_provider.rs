use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response body of `/movie/{id}/watch/providers`
#[derive(Debug, Clone, Deserialize)]
pub struct WatchProviderResponse {
    #[serde(default)]
    pub id: Option<u64>,
    /// Keyed by two-letter region code
    #[serde(default)]
    pub results: HashMap<String, RegionAvailability>,
}

impl WatchProviderResponse {
    /// Consumes the response, keeping only the requested region
    pub fn into_region(mut self, region: &str) -> Option<RegionAvailability> {
        self.results.remove(region)
    }
}

/// Availability of a movie in one region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegionAvailability {
    /// Deep link to the aggregator page for this movie and region
    #[serde(default)]
    pub link: Option<String>,
    /// Subscription tier
    #[serde(default)]
    pub flatrate: Option<Vec<WatchProvider>>,
}

impl RegionAvailability {
    /// Subscription providers, empty when the tier is absent
    pub fn subscription_providers(&self) -> &[WatchProvider] {
        self.flatrate.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}
