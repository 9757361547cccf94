use crate::{models::Movie, views::html::escape};

/// Image size variants served by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    Backdrop,
    Logo,
}

impl ImageSize {
    fn segment(self) -> &'static str {
        match self {
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "w1280",
            ImageSize::Logo => "original",
        }
    }

    fn dimensions(self) -> (u32, u32) {
        match self {
            ImageSize::Poster => (500, 750),
            ImageSize::Backdrop => (1280, 720),
            ImageSize::Logo => (50, 50),
        }
    }
}

/// Full CDN URL for a partial image path
pub fn image_url(base_url: &str, size: ImageSize, path: &str) -> String {
    format!("{}/{}{}", base_url.trim_end_matches('/'), size.segment(), path)
}

/// What an image slot shows before the browser has tried to load anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieImage {
    /// Skeleton; also used when there is no path to load
    Placeholder,
    Image { src: String, alt: String },
}

impl MovieImage {
    pub fn poster(base_url: &str, movie: Option<&Movie>, is_loading: bool) -> Self {
        let Some(movie) = movie.filter(|_| !is_loading) else {
            return MovieImage::Placeholder;
        };
        let Some(path) = movie.poster_path.as_deref() else {
            return MovieImage::Placeholder;
        };

        let alt = if movie.display_title().is_empty() {
            "Movie poster".to_string()
        } else {
            format!("{} poster", movie.display_title())
        };

        MovieImage::Image {
            src: image_url(base_url, ImageSize::Poster, path),
            alt,
        }
    }

    /// Renders the slot. The skeleton stays until the image loads or fails; the
    /// localized "not available" text is hidden unless the load fails.
    pub fn render(&self, size: ImageSize, unavailable_text: &str) -> String {
        match self {
            MovieImage::Placeholder => {
                r#"<div class="movie-image"><div class="skeleton"></div></div>"#.to_string()
            }
            MovieImage::Image { src, alt } => {
                let (width, height) = size.dimensions();
                format!(
                    concat!(
                        r#"<div class="movie-image">"#,
                        r#"<div class="skeleton"></div>"#,
                        r#"<img src="{src}" alt="{alt}" width="{width}" height="{height}" loading="lazy" "#,
                        r#"onload="this.previousElementSibling.remove()" "#,
                        r#"onerror="this.nextElementSibling.hidden=false;this.previousElementSibling.remove();this.remove()">"#,
                        r#"<div class="image-unavailable" hidden>{unavailable}</div>"#,
                        "</div>"
                    ),
                    src = escape(src),
                    alt = escape(alt),
                    width = width,
                    height = height,
                    unavailable = escape(unavailable_text),
                )
            }
        }
    }
}
