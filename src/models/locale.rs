use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Supported interface languages. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "es_AR")]
    EsAr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::EsAr];

    /// Code stored in the preference cookie and sent to the catalog
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::EsAr => "es_AR",
        }
    }

    /// BCP 47 tag used for the `lang` attribute and upstream metadata
    pub fn language_tag(self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::EsAr => "es-AR",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::EsAr => &ES_AR,
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Exact match against the known codes only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code() == s)
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

/// Flat string table for one locale
#[derive(Debug, PartialEq, Eq)]
pub struct Strings {
    pub search_placeholder: &'static str,
    pub search_button: &'static str,
    pub stars: &'static str,
    pub director: &'static str,
    pub imdb_rating: &'static str,
    pub votes: &'static str,
    pub where_to_watch: &'static str,
    pub similar: &'static str,
    pub no_movies_found: &'static str,
    pub no_movies_message: &'static str,
    pub error_fetching: &'static str,
    pub error_movie_details: &'static str,
    pub error_similar_movies: &'static str,
    pub no_providers: &'static str,
    pub google_it: &'static str,
    pub image_not_available: &'static str,
    pub language_label: &'static str,
    pub english: &'static str,
    pub spanish: &'static str,
}

static EN: Strings = Strings {
    search_placeholder: "Search movies, directors, actors...",
    search_button: "Search",
    stars: "Stars",
    director: "Director",
    imdb_rating: "IMDb RATING",
    votes: "votes",
    where_to_watch: "WHERE TO WATCH",
    similar: "Similar Movies",
    no_movies_found: "No movies found",
    no_movies_message:
        "Maybe the movie is too new or not popular enough to have a recommendation yet.",
    error_fetching: "We have a problem fetching the movies: ",
    error_movie_details: "Error fetching movie details: ",
    error_similar_movies: "Error fetching similar movies: ",
    no_providers: "No streaming services available in your region.",
    google_it: "Google it!",
    image_not_available: "Image not available",
    language_label: "Language",
    english: "English",
    spanish: "Español",
};

static ES_AR: Strings = Strings {
    search_placeholder: "Buscar películas, directores, actores...",
    search_button: "Buscar",
    stars: "Actores",
    director: "Director",
    imdb_rating: "PUNTAJE IMDb",
    votes: "votos",
    where_to_watch: "DÓNDE VER",
    similar: "Películas Similares",
    no_movies_found: "No se encontraron películas",
    no_movies_message: "Quizás la película es muy nueva o no es lo suficientemente popular como para tener una recomendación todavía.",
    error_fetching: "Tenemos un problema al obtener las películas: ",
    error_movie_details: "Error al obtener los detalles de la película: ",
    error_similar_movies: "Error al obtener películas similares: ",
    no_providers: "No hay servicios de streaming disponibles en tu región.",
    google_it: "¡Buscalo en Google!",
    image_not_available: "Imagen no disponible",
    language_label: "Idioma",
    english: "Inglés",
    spanish: "Español",
};
