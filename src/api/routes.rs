use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Pages
        .route("/", get(handlers::search_page))
        .route("/search/results", get(handlers::search_results))
        .route("/movie/:tconst", get(handlers::movie_page))
        .route("/movie/:tconst/:region", get(handlers::movie_region))
        .route("/language/:code", get(handlers::set_language))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// JSON routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/movie-providers", get(handlers::movie_providers))
        .route("/movie/:tconst/view", get(handlers::movie_view))
}

/// Cross-origin access to the JSON routes, for the configured origins only
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}
