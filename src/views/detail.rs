use std::fmt::Write;

use crate::{
    models::{Movie, RegionAvailability, Strings},
    services::{
        detail::{DetailRegion, DetailView},
        fetch::LoadState,
    },
    views::{
        html::{encode, escape, layout},
        image::{image_url, ImageSize},
        search::{movie_grid, skeleton_grid},
    },
};

/// Renders a movie detail page.
///
/// Each region is rendered from its own slot: a failed metadata fetch still shows
/// the similar-movies grid, and vice versa. A region still loading is rendered as a
/// placeholder whose `data-src` serves the finished region.
pub fn render_detail(view: &DetailView, image_base_url: &str) -> String {
    let strings = view.locale.strings();
    let title = match view.movie.state() {
        LoadState::Ready(movie) => movie.display_title().to_string(),
        _ => "cinefind".to_string(),
    };

    let mut content = movie_region(view, image_base_url);
    let _ = write!(
        content,
        r#"<hr class="separator"><h2 class="similar-title">{}</h2>"#,
        escape(strings.similar)
    );
    content.push_str(&similar_region(view, image_base_url));

    layout(view.locale, &title, &content)
}

/// Markup of one region on its own, as served to a page that rendered it loading.
///
/// `title` names the movie in the no-providers search link when only the providers
/// region is rendered.
pub fn render_region(
    view: &DetailView,
    region: DetailRegion,
    title: &str,
    image_base_url: &str,
) -> String {
    match region {
        DetailRegion::Movie => movie_region(view, image_base_url),
        DetailRegion::Similar => similar_region(view, image_base_url),
        DetailRegion::Providers => providers_region(view, title, image_base_url),
    }
}

fn region_src(view: &DetailView, region: DetailRegion) -> String {
    format!("/movie/{}/{}", encode(&view.tconst), region.path_segment())
}

fn movie_region(view: &DetailView, image_base_url: &str) -> String {
    let strings = view.locale.strings();
    match view.movie.state() {
        LoadState::Ready(movie) => movie_section(view, movie, image_base_url, strings),
        LoadState::Failed(message) => {
            format!(r#"<div class="error movie-error">{}</div>"#, escape(message))
        }
        LoadState::Loading => format!(
            r#"<section class="movie loading" data-src="{}"><div class="skeleton"></div></section>"#,
            escape(&region_src(view, DetailRegion::Movie))
        ),
    }
}

fn similar_region(view: &DetailView, image_base_url: &str) -> String {
    let strings = view.locale.strings();
    match view.similar.state() {
        LoadState::Loading => format!(
            r#"<div class="similar loading" data-src="{}">{}</div>"#,
            escape(&region_src(view, DetailRegion::Similar)),
            skeleton_grid()
        ),
        LoadState::Failed(message) => format!(
            r#"<div class="similar"><div class="error similar-error">{}</div></div>"#,
            escape(message)
        ),
        LoadState::Ready(movies) => format!(
            r#"<div class="similar">{}</div>"#,
            movie_grid(movies, image_base_url, strings.image_not_available)
        ),
    }
}

fn providers_region(view: &DetailView, title: &str, image_base_url: &str) -> String {
    let strings = view.locale.strings();
    match view.providers.state() {
        LoadState::Loading => format!(
            r#"<div class="where-to-watch loading" data-src="{}?title={}"><h3>{}</h3><div class="skeleton"></div></div>"#,
            escape(&region_src(view, DetailRegion::Providers)),
            encode(title),
            escape(strings.where_to_watch),
        ),
        state => where_to_watch(title, state, image_base_url, strings),
    }
}

fn movie_section(
    view: &DetailView,
    movie: &Movie,
    image_base_url: &str,
    strings: &Strings,
) -> String {
    let mut html = String::from(r#"<section class="movie">"#);
    let title = movie.display_title();

    if let Some(path) = movie.backdrop_path.as_deref() {
        let _ = write!(
            html,
            r#"<img class="backdrop" src="{}" alt="{} backdrop" width="1280" height="720">"#,
            escape(&image_url(image_base_url, ImageSize::Backdrop, path)),
            escape(title),
        );
    }
    if let Some(path) = movie.poster_path.as_deref() {
        let _ = write!(
            html,
            r#"<img class="poster" src="{}" alt="{} poster" width="500" height="750">"#,
            escape(&image_url(image_base_url, ImageSize::Poster, path)),
            escape(title),
        );
    }

    let _ = write!(html, r#"<div class="details"><h1>{}</h1>"#, escape(title));

    if let Some(overview) = movie.overview.as_deref() {
        let _ = write!(html, r#"<p class="overview">{}</p>"#, escape(overview));
    }

    let genres = movie.genre_list();
    if !genres.is_empty() {
        html.push_str(r#"<div class="genres">"#);
        for genre in genres {
            let _ = write!(html, r#"<span class="badge">{}</span>"#, escape(genre));
        }
        html.push_str("</div>");
    }

    let year = movie.release_year().unwrap_or_default();
    let runtime = movie.runtime_label().unwrap_or_default();
    if !year.is_empty() || !runtime.is_empty() {
        let _ = write!(
            html,
            r#"<p class="release">{} | {}</p>"#,
            escape(year),
            escape(&runtime)
        );
    }

    if let Some(directors) = movie.director_names.as_deref() {
        let _ = write!(
            html,
            r#"<p class="credits"><span class="label">{}:</span> {}</p>"#,
            escape(strings.director),
            escape(directors)
        );
    }
    if let Some(actors) = movie.actor_names.as_deref() {
        let _ = write!(
            html,
            r#"<p class="credits"><span class="label">{}:</span> {}</p>"#,
            escape(strings.stars),
            escape(actors)
        );
    }

    html.push_str(r#"<div class="badges">"#);
    html.push_str(&rating_card(movie, strings));
    html.push_str(&providers_region(view, title, image_base_url));
    html.push_str("</div></div></section>");
    html
}

fn rating_card(movie: &Movie, strings: &Strings) -> String {
    let rating = movie
        .average_rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".to_string());
    let votes = movie.votes_label().unwrap_or_default();

    format!(
        r#"<a class="rating" href="{url}" target="_blank" rel="noopener noreferrer"><p class="label">{label}</p><div class="card"><p class="score">{rating} <span>/10</span></p><p class="votes">{votes} {votes_word}</p></div></a>"#,
        url = escape(&movie.imdb_ratings_url()),
        label = escape(strings.imdb_rating),
        rating = rating,
        votes = escape(&votes),
        votes_word = escape(strings.votes),
    )
}

fn where_to_watch(
    title: &str,
    providers: &LoadState<Option<RegionAvailability>>,
    image_base_url: &str,
    strings: &Strings,
) -> String {
    let mut html = format!(
        r#"<div class="where-to-watch"><h3>{}</h3>"#,
        escape(strings.where_to_watch)
    );

    match providers {
        LoadState::Loading => {}
        LoadState::Ready(Some(region)) if !region.subscription_providers().is_empty() => {
            let link = region.link.as_deref().unwrap_or("#");
            let _ = write!(
                html,
                r#"<a class="providers card" href="{}" target="_blank" rel="noopener noreferrer">"#,
                escape(link)
            );
            for provider in region.subscription_providers() {
                match provider.logo_path.as_deref() {
                    Some(logo) => {
                        let _ = write!(
                            html,
                            r#"<img class="provider-logo" src="{}" alt="{}" title="{}" width="50" height="50">"#,
                            escape(&image_url(image_base_url, ImageSize::Logo, logo)),
                            escape(&provider.provider_name),
                            escape(&provider.provider_name),
                        );
                    }
                    None => {
                        let _ = write!(
                            html,
                            r#"<span class="provider-name">{}</span>"#,
                            escape(&provider.provider_name)
                        );
                    }
                }
            }
            html.push_str("</a>");
        }
        // No subscription tier, no entry for the region, or a failed lookup.
        _ => {
            let search = format!("{} movie watch online", title);
            let _ = write!(
                html,
                r#"<p class="no-providers">{} <a href="https://www.google.com/search?q={}" target="_blank" rel="noopener noreferrer">{}</a></p>"#,
                escape(strings.no_providers),
                encode(&search),
                escape(strings.google_it),
            );
        }
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Locale, WatchProvider},
        services::fetch::FetchError,
    };

    const BASE: &str = "https://image.tmdb.org/t/p";

    fn interstellar() -> Movie {
        Movie {
            tconst: "tt0816692".to_string(),
            title: "Interstellar".to_string(),
            overview: Some("Explorers & a wormhole.".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            release_date: Some("2014-11-05".to_string()),
            runtime_minutes: Some(169),
            genres: Some("Adventure Drama".to_string()),
            average_rating: Some(8.7),
            num_votes: Some(2_134_567),
            director_names: Some("Christopher Nolan".to_string()),
            actor_names: Some("Matthew McConaughey".to_string()),
            ..Movie::default()
        }
    }

    fn view_with(
        movie: Result<Movie, FetchError>,
        similar: Result<Vec<Movie>, FetchError>,
        providers: Result<Option<RegionAvailability>, FetchError>,
    ) -> DetailView {
        let mut view = DetailView::new("tt0816692", Locale::En);
        let tickets = view.start(&[
            DetailRegion::Movie,
            DetailRegion::Similar,
            DetailRegion::Providers,
        ]);
        view.apply(tickets, Some(movie), Some(similar), Some(providers));
        view
    }

    #[test]
    fn test_full_page() {
        let region = RegionAvailability {
            link: Some("https://example.test/watch?locale=AR".to_string()),
            flatrate: Some(vec![WatchProvider {
                provider_id: 8,
                provider_name: "Netflix".to_string(),
                logo_path: Some("/netflix.jpg".to_string()),
            }]),
        };
        let html = render_detail(
            &view_with(Ok(interstellar()), Ok(vec![]), Ok(Some(region))),
            BASE,
        );

        assert!(html.contains("<title>Interstellar</title>"));
        assert!(html.contains("Explorers &amp; a wormhole."));
        assert!(html.contains(r#"<span class="badge">Adventure</span>"#));
        assert!(html.contains("2014 | 2 h 49 min"));
        assert!(html.contains("Christopher Nolan"));
        assert!(html.contains("8.7 <span>/10</span>"));
        assert!(html.contains("2.1M votes"));
        assert!(html.contains("https://image.tmdb.org/t/p/w1280/backdrop.jpg"));
        assert!(html.contains("https://image.tmdb.org/t/p/original/netflix.jpg"));
        assert!(html.contains("https://example.test/watch?locale=AR"));
        assert!(!html.contains("No streaming services"));
    }

    #[test]
    fn test_no_region_shows_fallback_link() {
        let html = render_detail(&view_with(Ok(interstellar()), Ok(vec![]), Ok(None)), BASE);
        assert!(html.contains("No streaming services available in your region."));
        assert!(html.contains("q=Interstellar%20movie%20watch%20online"));
    }

    #[test]
    fn test_provider_failure_shows_fallback() {
        let html = render_detail(
            &view_with(
                Ok(interstellar()),
                Ok(vec![]),
                Err(FetchError::Transport("down".to_string())),
            ),
            BASE,
        );
        assert!(html.contains("No streaming services available in your region."));
    }

    #[test]
    fn test_metadata_failure_still_renders_similar() {
        let similar = vec![Movie {
            tconst: "tt1375666".to_string(),
            title: "Inception".to_string(),
            poster_path: Some("/inception.jpg".to_string()),
            ..Movie::default()
        }];
        let html = render_detail(
            &view_with(Err(FetchError::Status(500)), Ok(similar), Ok(None)),
            BASE,
        );

        assert!(html.contains("Error fetching movie details: HTTP error! status: 500"));
        assert!(html.contains(r#"href="/movie/tt1375666""#));
        assert!(html.contains("Similar Movies"));
    }

    #[test]
    fn test_similar_failure_keeps_movie() {
        let html = render_detail(
            &view_with(Ok(interstellar()), Err(FetchError::Status(404)), Ok(None)),
            BASE,
        );
        assert!(html.contains("<h1>Interstellar</h1>"));
        assert!(html.contains("Error fetching similar movies: HTTP error! status: 404"));
    }

    #[test]
    fn test_loading_regions_point_at_their_source() {
        let mut view = DetailView::new("tt0816692", Locale::En);
        let tickets = view.start(&[DetailRegion::Movie, DetailRegion::Providers]);
        view.apply(tickets, Some(Ok(interstellar())), None, None);

        let html = render_detail(&view, BASE);
        assert!(html.contains("<h1>Interstellar</h1>"));
        assert!(html.contains(r#"data-src="/movie/tt0816692/similar""#));
        assert!(html.contains(r#"data-src="/movie/tt0816692/providers?title=Interstellar""#));
        assert!(html.contains(r#"class="movie-grid loading""#));
    }

    #[test]
    fn test_loading_movie_region_placeholder() {
        let view = DetailView::new("tt0816692", Locale::En);
        let html = render_region(&view, DetailRegion::Movie, "", BASE);
        assert!(html.contains(r#"data-src="/movie/tt0816692/movie""#));
    }

    #[test]
    fn test_providers_region_alone() {
        let mut view = DetailView::new("tt0816692", Locale::En);
        let tickets = view.start(&[DetailRegion::Providers]);
        view.apply(tickets, None, None, Some(Ok(None)));

        let html = render_region(&view, DetailRegion::Providers, "Interstellar", BASE);
        assert!(html.starts_with(r#"<div class="where-to-watch">"#));
        assert!(html.contains("q=Interstellar%20movie%20watch%20online"));
        assert!(!html.contains("<html"));
    }
}
