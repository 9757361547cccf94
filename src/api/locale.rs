use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::{
    models::Locale,
    services::localization::{preference_cookie, resolve_for_request, LocaleSource},
};

use super::AppState;

/// Locale of the current request, resolved once per request and passed down to
/// the views explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleContext {
    pub locale: Locale,
    pub source: LocaleSource,
}

impl LocaleContext {
    /// Response headers persisting the locale when it was adopted from the server
    /// default, so later requests skip the lookup
    pub fn persist_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.source == LocaleSource::ServerDefault {
            headers.insert(header::SET_COOKIE, preference_cookie(self.locale));
        }
        headers
    }
}

#[async_trait]
impl FromRequestParts<AppState> for LocaleContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (locale, source) = resolve_for_request(state.catalog.as_ref(), &parts.headers).await;
        tracing::debug!(locale = %locale, source = ?source, "Locale resolved");
        Ok(Self { locale, source })
    }
}
