use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::Locale,
    services::{
        detail::{DetailRegion, DetailSources, DetailView},
        localization::preference_cookie,
        search::SearchView,
    },
    views::{render_detail, render_region, render_results, render_search},
};

use super::{AppState, LocaleContext};

// Request types

#[derive(Debug, Deserialize)]
pub struct ProviderQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    #[serde(default)]
    pub title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Watch-provider proxy.
///
/// Relays the upstream document byte for byte; the API key never leaves the server.
pub async fn movie_providers(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<ProviderQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let movie_id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::MissingParameter("Movie ID is required".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        movie_id = %movie_id,
        "Proxying watch provider lookup"
    );

    let body = state.providers.fetch_raw(movie_id).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Search page; results slower than the render deadline are sent as loading
pub async fn search_page(
    State(state): State<AppState>,
    locale: LocaleContext,
    Query(params): Query<SearchQuery>,
) -> (HeaderMap, Html<String>) {
    let view = SearchView::open(
        &params.search,
        locale.locale,
        state.catalog.as_ref(),
        Some(state.render_deadline),
    )
    .await;
    (
        locale.persist_headers(),
        Html(render_search(&view, &state.image_base_url)),
    )
}

/// Search results region, for a page that was sent while it was loading
pub async fn search_results(
    State(state): State<AppState>,
    locale: LocaleContext,
    Query(params): Query<SearchQuery>,
) -> Html<String> {
    let view = SearchView::open(&params.search, locale.locale, state.catalog.as_ref(), None).await;
    Html(render_results(&view, &state.image_base_url))
}

/// Movie detail page; regions slower than the render deadline are sent as loading
pub async fn movie_page(
    State(state): State<AppState>,
    locale: LocaleContext,
    Path(tconst): Path<String>,
) -> (HeaderMap, Html<String>) {
    let view = DetailView::open(
        &tconst,
        locale.locale,
        detail_sources(&state),
        Some(state.render_deadline),
    )
    .await;
    (
        locale.persist_headers(),
        Html(render_detail(&view, &state.image_base_url)),
    )
}

/// One detail page region, for a page that was sent while it was loading
pub async fn movie_region(
    State(state): State<AppState>,
    locale: LocaleContext,
    Path((tconst, region)): Path<(String, String)>,
    Query(params): Query<RegionQuery>,
) -> AppResult<Html<String>> {
    let region: DetailRegion = region.parse().map_err(AppError::InvalidInput)?;
    let view =
        DetailView::load_region(&tconst, locale.locale, region, detail_sources(&state)).await;
    Ok(Html(render_region(
        &view,
        region,
        &params.title,
        &state.image_base_url,
    )))
}

/// Movie detail view state as JSON, every region loaded
pub async fn movie_view(
    State(state): State<AppState>,
    locale: LocaleContext,
    Path(tconst): Path<String>,
) -> Json<DetailView> {
    Json(DetailView::open(&tconst, locale.locale, detail_sources(&state), None).await)
}

fn detail_sources(state: &AppState) -> DetailSources<'_> {
    DetailSources {
        catalog: state.catalog.as_ref(),
        providers: state.providers.as_ref(),
        region: &state.watch_region,
    }
}

/// Persists a language choice and sends the user back where they came from
pub async fn set_language(Path(code): Path<String>, headers: HeaderMap) -> AppResult<Response> {
    let locale: Locale = code
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Unsupported language: {}", code)))?;

    let target = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(local_redirect_target)
        .unwrap_or_else(|| "/".to_string());

    tracing::info!(locale = %locale, "Language preference updated");

    Ok((
        [(header::SET_COOKIE, preference_cookie(locale))],
        Redirect::to(&target),
    )
        .into_response())
}

/// Path and query of a referer, so the redirect never leaves this site
fn local_redirect_target(referer: &str) -> Option<String> {
    let url = url::Url::parse(referer).ok()?;
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    // "//host" would be read as a scheme-relative URL.
    if target.starts_with("//") {
        return None;
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_redirect_target() {
        assert_eq!(
            local_redirect_target("https://cinefind.example/movie/tt1?x=1").as_deref(),
            Some("/movie/tt1?x=1")
        );
        assert_eq!(
            local_redirect_target("https://evil.example/").as_deref(),
            Some("/")
        );
        assert_eq!(local_redirect_target("https://a.example//evil.example/x"), None);
        assert_eq!(local_redirect_target("not a url"), None);
    }
}
