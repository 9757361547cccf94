use serde::{Deserialize, Deserializer, Serialize};

/// A movie as returned by the catalog backend.
///
/// Only `tconst` is guaranteed. Every other field is optional and checked before
/// rendering; the catalog owns the schema and this crate only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Movie {
    /// Catalog key (IMDb-style, e.g. "tt0816692")
    pub tconst: String,
    /// Third-party numeric id, when the catalog knows it
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "originalTitle", deserialize_with = "non_empty")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub release_date: Option<String>,
    #[serde(default, rename = "runtimeMinutes", deserialize_with = "lenient_u64")]
    pub runtime_minutes: Option<u64>,
    /// Space-separated genre tokens
    #[serde(default, deserialize_with = "non_empty")]
    pub genres: Option<String>,
    #[serde(default, rename = "averageRating", deserialize_with = "lenient_f64")]
    pub average_rating: Option<f64>,
    #[serde(default, rename = "numVotes", deserialize_with = "lenient_u64")]
    pub num_votes: Option<u64>,
    #[serde(default, deserialize_with = "non_empty")]
    pub director_names: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub actor_names: Option<String>,
}

impl Movie {
    /// Genre tokens in catalog order
    pub fn genre_list(&self) -> Vec<&str> {
        self.genres
            .as_deref()
            .map(|g| g.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Year component of `release_date` ("2014-11-05" -> "2014")
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    /// Runtime as "2 h 49 min"
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime_minutes
            .filter(|m| *m > 0)
            .map(|m| format!("{} h {} min", m / 60, m % 60))
    }

    /// Compact vote count: 1.2M, 3.4K, or the raw number below a thousand
    pub fn votes_label(&self) -> Option<String> {
        self.num_votes.map(format_votes)
    }

    /// External ratings page for this title
    pub fn imdb_ratings_url(&self) -> String {
        format!("https://www.imdb.com/title/{}/ratings", self.tconst)
    }

    /// Display title, falling back to the original title
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.original_title.as_deref().unwrap_or_default()
        } else {
            &self.title
        }
    }
}

pub fn format_votes(votes: u64) -> String {
    if votes >= 1_000_000 {
        format!("{:.1}M", votes as f64 / 1_000_000.0)
    } else if votes >= 1_000 {
        format!("{:.1}K", votes as f64 / 1_000.0)
    } else {
        votes.to_string()
    }
}

/// Envelope of `GET /api/movies`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MovieListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub movies: Vec<Movie>,
}

/// Envelope of `GET /api/recommend`, ordered by rank
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecommendationResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recommendations: Vec<Movie>,
}

/// Envelope of `GET /api/default_language`
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultLanguageResponse {
    #[serde(default)]
    pub default_language: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Movie>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Movie>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// The catalog serializes NaN as null and occasionally numbers as strings.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite()))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|v| *v >= 0.0)
        .map(|v| v as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interstellar() -> Movie {
        serde_json::from_str(
            r#"{
                "tconst": "tt0816692",
                "id": 157336,
                "title": "Interstellar",
                "overview": "A team of explorers travel through a wormhole.",
                "poster_path": "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
                "backdrop_path": "/xJHokMbljvjADYdit5fK5VQsXEG.jpg",
                "release_date": "2014-11-05",
                "runtimeMinutes": 169,
                "genres": "Adventure Drama Sci-Fi",
                "averageRating": 8.7,
                "numVotes": 2134567,
                "director_names": "Christopher Nolan",
                "actor_names": "Matthew McConaughey, Anne Hathaway"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_full_movie_deserialization() {
        let movie = interstellar();
        assert_eq!(movie.tconst, "tt0816692");
        assert_eq!(movie.id, Some(157336));
        assert_eq!(movie.runtime_minutes, Some(169));
        assert_eq!(movie.average_rating, Some(8.7));
        assert_eq!(movie.genre_list(), vec!["Adventure", "Drama", "Sci-Fi"]);
    }

    #[test]
    fn test_sparse_movie_deserialization() {
        let movie: Movie = serde_json::from_str(
            r#"{"tconst": "tt1", "overview": "", "runtimeMinutes": "\\N", "averageRating": null, "numVotes": "1234"}"#,
        )
        .unwrap();
        assert_eq!(movie.title, "");
        assert_eq!(movie.overview, None);
        assert_eq!(movie.runtime_minutes, None);
        assert_eq!(movie.average_rating, None);
        assert_eq!(movie.num_votes, Some(1234));
        assert!(movie.genre_list().is_empty());
        assert_eq!(movie.runtime_label(), None);
    }

    #[test]
    fn test_release_year() {
        assert_eq!(interstellar().release_year(), Some("2014"));
        let movie = Movie {
            release_date: Some("-".to_string()),
            ..Movie::default()
        };
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_runtime_label() {
        assert_eq!(interstellar().runtime_label(), Some("2 h 49 min".to_string()));
    }

    #[test]
    fn test_format_votes() {
        assert_eq!(format_votes(2_134_567), "2.1M");
        assert_eq!(format_votes(45_300), "45.3K");
        assert_eq!(format_votes(1_000), "1.0K");
        assert_eq!(format_votes(999), "999");
    }

    #[test]
    fn test_imdb_ratings_url() {
        assert_eq!(
            interstellar().imdb_ratings_url(),
            "https://www.imdb.com/title/tt0816692/ratings"
        );
    }

    #[test]
    fn test_display_title_falls_back_to_original() {
        let movie = Movie {
            tconst: "tt2".to_string(),
            original_title: Some("El secreto de sus ojos".to_string()),
            ..Movie::default()
        };
        assert_eq!(movie.display_title(), "El secreto de sus ojos");
    }

    #[test]
    fn test_recommendation_order_preserved() {
        let response: RecommendationResponse = serde_json::from_str(
            r#"{"recommendations": [{"tconst": "tt3"}, {"tconst": "tt1"}, {"tconst": "tt2"}]}"#,
        )
        .unwrap();
        let ids: Vec<&str> = response
            .recommendations
            .iter()
            .map(|m| m.tconst.as_str())
            .collect();
        assert_eq!(ids, vec!["tt3", "tt1", "tt2"]);
    }

    #[test]
    fn test_null_movie_list_is_empty() {
        let response: MovieListResponse = serde_json::from_str(r#"{"movies": null}"#).unwrap();
        assert!(response.movies.is_empty());
    }
}
