use std::fmt::Write;

use crate::{
    models::Movie,
    services::search::{SearchState, SearchView},
    views::{
        html::{encode, escape, layout},
        image::{ImageSize, MovieImage},
    },
};

/// Number of skeleton cards shown while a grid is loading
pub const SKELETON_COUNT: usize = 10;

/// Renders the search page
pub fn render_search(view: &SearchView, image_base_url: &str) -> String {
    let strings = view.locale.strings();
    let mut content = String::new();

    let _ = write!(
        content,
        r#"<form action="/" method="get" class="search-bar">
<input type="text" name="search" value="{query}" placeholder="{placeholder}">
<button type="submit">{button}</button>
</form>
"#,
        query = escape(&view.query),
        placeholder = escape(strings.search_placeholder),
        button = escape(strings.search_button),
    );

    content.push_str(&render_results(view, image_base_url));

    layout(view.locale, "cinefind", &content)
}

/// Results region on its own. While loading it carries the URL that serves the
/// finished region.
pub fn render_results(view: &SearchView, image_base_url: &str) -> String {
    let strings = view.locale.strings();
    let inner = match view.state() {
        SearchState::Loading => {
            return format!(
                r#"<div class="results loading" data-src="/search/results?search={}">{}</div>"#,
                encode(&view.query),
                skeleton_grid()
            );
        }
        SearchState::Empty => format!(
            r#"<div class="empty-state"><p class="title">{}</p><p class="message">{}</p></div>"#,
            escape(strings.no_movies_found),
            escape(strings.no_movies_message),
        ),
        SearchState::Failed(message) => format!(r#"<div class="error">{}</div>"#, escape(message)),
        SearchState::Grid(movies) => movie_grid(movies, image_base_url, strings.image_not_available),
    };
    format!(r#"<div class="results">{}</div>"#, inner)
}

/// Grid of skeleton cards
pub fn skeleton_grid() -> String {
    let mut grid = String::from(r#"<div class="movie-grid loading">"#);
    for _ in 0..SKELETON_COUNT {
        grid.push_str(&MovieImage::Placeholder.render(ImageSize::Poster, ""));
    }
    grid.push_str("</div>");
    grid
}

/// Grid of poster cards linking to each movie's detail page
pub fn movie_grid(movies: &[Movie], image_base_url: &str, unavailable_text: &str) -> String {
    let mut grid = String::from(r#"<div class="movie-grid">"#);
    for movie in movies {
        let _ = write!(
            grid,
            r#"<a href="/movie/{}" class="movie-card" title="{}">{}</a>"#,
            encode(&movie.tconst),
            escape(movie.display_title()),
            MovieImage::poster(image_base_url, Some(movie), false)
                .render(ImageSize::Poster, unavailable_text),
        );
    }
    grid.push_str("</div>");
    grid
}
