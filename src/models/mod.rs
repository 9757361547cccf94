pub mod locale;
pub mod movie;
pub mod watch_provider;

pub use locale::{Locale, Strings};
pub use movie::{
    format_votes, DefaultLanguageResponse, Movie, MovieListResponse, RecommendationResponse,
};
pub use watch_provider::{RegionAvailability, WatchProvider, WatchProviderResponse};
