use std::{str::FromStr, time::Duration};

use serde::Serialize;

use crate::{
    models::{Locale, Movie, RegionAvailability},
    services::{
        catalog::CatalogApi,
        fetch::{within_deadline, FetchError, FetchSlot, FetchTicket},
        providers::WatchProviderSource,
    },
};

/// Upstreams the detail view reads from
#[derive(Clone, Copy)]
pub struct DetailSources<'a> {
    pub catalog: &'a dyn CatalogApi,
    pub providers: &'a dyn WatchProviderSource,
    /// Region key read from watch-provider results
    pub region: &'a str,
}

/// Part of the detail page that loads on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailRegion {
    /// Metadata; the where-to-watch block is rendered inside it
    Movie,
    Similar,
    Providers,
}

impl DetailRegion {
    pub fn path_segment(self) -> &'static str {
        match self {
            DetailRegion::Movie => "movie",
            DetailRegion::Similar => "similar",
            DetailRegion::Providers => "providers",
        }
    }
}

impl FromStr for DetailRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            DetailRegion::Movie,
            DetailRegion::Similar,
            DetailRegion::Providers,
        ]
        .into_iter()
        .find(|region| region.path_segment() == s)
        .ok_or_else(|| format!("Unknown page region: {}", s))
    }
}

/// State of a movie detail page.
///
/// The three regions are fetched concurrently and independently: each has its own
/// slot, so a slow or failing fetch only affects its own region.
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub tconst: String,
    pub locale: Locale,
    pub movie: FetchSlot<Movie>,
    pub similar: FetchSlot<Vec<Movie>>,
    pub providers: FetchSlot<Option<RegionAvailability>>,
}

/// Tickets for the fetches in flight; `None` means the region was not requested.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DetailTickets {
    pub movie: Option<FetchTicket>,
    pub similar: Option<FetchTicket>,
    pub providers: Option<FetchTicket>,
}

impl DetailView {
    pub fn new(tconst: impl Into<String>, locale: Locale) -> Self {
        Self {
            tconst: tconst.into(),
            locale,
            movie: FetchSlot::new(),
            similar: FetchSlot::new(),
            providers: FetchSlot::new(),
        }
    }

    /// Opens a detail page and loads all three regions.
    ///
    /// With a `deadline`, regions whose fetch takes longer stay `Loading`.
    pub async fn open(
        tconst: &str,
        locale: Locale,
        sources: DetailSources<'_>,
        deadline: Option<Duration>,
    ) -> Self {
        let mut view = Self::new(tconst, locale);
        let tickets = view.start(&[
            DetailRegion::Movie,
            DetailRegion::Similar,
            DetailRegion::Providers,
        ]);
        view.run(tickets, sources, deadline).await;
        view
    }

    /// Loads a single region to completion. The movie region brings its
    /// where-to-watch block along.
    pub async fn load_region(
        tconst: &str,
        locale: Locale,
        region: DetailRegion,
        sources: DetailSources<'_>,
    ) -> Self {
        let mut view = Self::new(tconst, locale);
        let tickets = match region {
            DetailRegion::Movie => view.start(&[DetailRegion::Movie, DetailRegion::Providers]),
            other => view.start(&[other]),
        };
        view.run(tickets, sources, None).await;
        view
    }

    /// Begins the fetches for `regions`; earlier tickets for them become stale
    pub fn start(&mut self, regions: &[DetailRegion]) -> DetailTickets {
        let mut tickets = DetailTickets::default();
        for region in regions {
            match region {
                DetailRegion::Movie => tickets.movie = Some(self.movie.begin()),
                DetailRegion::Similar => tickets.similar = Some(self.similar.begin()),
                DetailRegion::Providers => tickets.providers = Some(self.providers.begin()),
            }
        }
        tickets
    }

    /// Issues the fetches named by `tickets` concurrently and applies each result
    /// to its own region.
    ///
    /// Metadata is requested for the view's movie and locale; similar movies and
    /// providers only depend on the movie.
    pub async fn run(
        &mut self,
        tickets: DetailTickets,
        sources: DetailSources<'_>,
        deadline: Option<Duration>,
    ) {
        let tconst = self.tconst.clone();
        let locale = self.locale;

        let movie_fetch = async {
            match tickets.movie {
                Some(_) => {
                    within_deadline(deadline, sources.catalog.movie_details(&tconst, locale)).await
                }
                None => None,
            }
        };
        let similar_fetch = async {
            match tickets.similar {
                Some(_) => within_deadline(deadline, sources.catalog.recommendations(&tconst)).await,
                None => None,
            }
        };
        let providers_fetch = async {
            match tickets.providers {
                Some(_) => within_deadline(deadline, async {
                    sources
                        .providers
                        .fetch_region(&tconst, sources.region)
                        .await
                        .map_err(FetchError::from)
                })
                .await,
                None => None,
            }
        };

        let (movie, similar, providers) = tokio::join!(movie_fetch, similar_fetch, providers_fetch);

        if tickets.movie.is_some() && movie.is_none()
            || tickets.similar.is_some() && similar.is_none()
            || tickets.providers.is_some() && providers.is_none()
        {
            tracing::debug!(tconst = %tconst, "Rendering before every region finished");
        }

        self.apply(tickets, movie, similar, providers);
    }

    /// Applies fetch results; stale tickets are ignored per region
    pub fn apply(
        &mut self,
        tickets: DetailTickets,
        movie: Option<Result<Movie, FetchError>>,
        similar: Option<Result<Vec<Movie>, FetchError>>,
        providers: Option<Result<Option<RegionAvailability>, FetchError>>,
    ) {
        let strings = self.locale.strings();

        if let (Some(ticket), Some(result)) = (tickets.movie, movie) {
            if let Err(e) = &result {
                tracing::warn!(tconst = %self.tconst, error = %e, "Error fetching movie details");
            }
            self.movie.resolve(ticket, result, strings.error_movie_details);
        }

        if let (Some(ticket), Some(result)) = (tickets.similar, similar) {
            if let Err(e) = &result {
                tracing::warn!(tconst = %self.tconst, error = %e, "Error fetching similar movies");
            }
            self.similar.resolve(ticket, result, strings.error_similar_movies);
        }

        if let (Some(ticket), Some(result)) = (tickets.providers, providers) {
            if let Err(e) = &result {
                tracing::warn!(tconst = %self.tconst, error = %e, "Error fetching watch providers");
            }
            self.providers.resolve(ticket, result, "");
        }
    }
}
