use std::time::Duration;

use serde::Serialize;

use crate::{
    models::{Locale, Movie},
    services::{
        catalog::CatalogApi,
        fetch::{within_deadline, FetchError, FetchSlot, FetchTicket, LoadState},
    },
};

/// State of the search page.
///
/// A new fetch is issued on every submitted query, including the empty one which
/// asks the catalog for its default listing.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub locale: Locale,
    pub results: FetchSlot<Vec<Movie>>,
    /// Set once a fetch for the current query has completed
    pub has_searched: bool,
}

/// What the search page shows
#[derive(Debug, PartialEq)]
pub enum SearchState<'a> {
    /// Skeleton placeholders
    Loading,
    /// A completed search returned nothing
    Empty,
    Grid(&'a [Movie]),
    Failed(&'a str),
}

impl SearchView {
    pub fn new(locale: Locale) -> Self {
        Self {
            query: String::new(),
            locale,
            results: FetchSlot::new(),
            has_searched: false,
        }
    }

    /// Runs a search for `query` and returns the view.
    ///
    /// With a `deadline`, a slower search leaves the results `Loading`.
    pub async fn open(
        query: &str,
        locale: Locale,
        catalog: &dyn CatalogApi,
        deadline: Option<Duration>,
    ) -> Self {
        let mut view = Self::new(locale);
        let ticket = view.submit(query);
        view.run(ticket, catalog, deadline).await;
        view
    }

    /// Records an explicit form submission and begins its fetch
    pub fn submit(&mut self, query: &str) -> FetchTicket {
        self.query = query.trim().to_string();
        self.has_searched = false;
        self.results.begin()
    }

    pub async fn run(
        &mut self,
        ticket: FetchTicket,
        catalog: &dyn CatalogApi,
        deadline: Option<Duration>,
    ) {
        let query = self.query.clone();
        let Some(result) = within_deadline(deadline, catalog.search_movies(&query)).await else {
            tracing::debug!("Search missed the render deadline");
            return;
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching movies");
        }
        self.finish(ticket, result);
    }

    fn finish(&mut self, ticket: FetchTicket, result: Result<Vec<Movie>, FetchError>) {
        if self
            .results
            .resolve(ticket, result, self.locale.strings().error_fetching)
        {
            self.has_searched = true;
        }
    }

    pub fn state(&self) -> SearchState<'_> {
        match self.results.state() {
            LoadState::Loading => SearchState::Loading,
            LoadState::Failed(message) => SearchState::Failed(message),
            LoadState::Ready(movies) if movies.is_empty() && self.has_searched => SearchState::Empty,
            LoadState::Ready(movies) => SearchState::Grid(movies),
        }
    }
}
