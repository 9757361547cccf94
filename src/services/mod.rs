pub mod catalog;
pub mod detail;
pub mod fetch;
pub mod localization;
pub mod providers;
pub mod search;

pub use catalog::{CatalogApi, HttpCatalog};
pub use detail::{DetailSources, DetailView};
pub use fetch::{FetchError, FetchSlot, LoadState};
pub use providers::{TmdbWatchProviders, WatchProviderSource};
pub use search::{SearchState, SearchView};
