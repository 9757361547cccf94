//! Locale resolution and preference persistence.
//!
//! The active locale is a request-scoped value computed by [`resolve_locale`] from
//! three inputs: the stored preference cookie, the catalog's default-language
//! suggestion and the `Accept-Language` header. Nothing here is global state.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::{
    models::Locale,
    services::catalog::CatalogApi,
};

/// Cookie holding the user's chosen locale code
pub const PREFERENCE_COOKIE: &str = "preferredLanguage";

const PREFERENCE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Where the resolved locale came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Stored,
    ServerDefault,
    Browser,
    Fallback,
}

/// Picks the active locale.
///
/// Order: stored preference, server default, browser heuristic, `en`. Each candidate
/// is only adopted if it is one of the known codes.
pub fn resolve_locale(
    stored: Option<&str>,
    server_default: Option<&str>,
    accept_language: Option<&str>,
) -> (Locale, LocaleSource) {
    if let Some(locale) = stored.and_then(|code| code.parse().ok()) {
        return (locale, LocaleSource::Stored);
    }
    if let Some(locale) = server_default.and_then(|code| code.parse().ok()) {
        return (locale, LocaleSource::ServerDefault);
    }
    if let Some(locale) = accept_language.and_then(browser_locale) {
        return (locale, LocaleSource::Browser);
    }
    (Locale::default(), LocaleSource::Fallback)
}

/// Browser heuristic over an `Accept-Language` value.
///
/// Takes the highest-weighted language tag: Spanish variants map to `es_AR`, any
/// other tag to `en`. `None` when the header holds no usable tag.
pub fn browser_locale(accept_language: &str) -> Option<Locale> {
    let mut best: Option<(&str, f32)> = None;

    for entry in accept_language.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() || tag == "*" {
            continue;
        }

        let weight = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        if weight <= 0.0 {
            continue;
        }

        // First entry wins ties, so browsers' ordering is respected.
        if best.map_or(true, |(_, w)| weight > w) {
            best = Some((tag, weight));
        }
    }

    best.map(|(tag, _)| {
        let lower = tag.to_ascii_lowercase();
        if lower == "es" || lower.starts_with("es-") || lower.starts_with("es_") {
            Locale::EsAr
        } else {
            Locale::En
        }
    })
}

/// Reads the stored preference from the `Cookie` header(s)
pub fn stored_preference(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == PREFERENCE_COOKIE)
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value persisting `locale`
pub fn preference_cookie(locale: Locale) -> HeaderValue {
    // Codes are plain ASCII, so this cannot fail to be a valid header value.
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        PREFERENCE_COOKIE,
        locale.code(),
        PREFERENCE_MAX_AGE_SECS
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("preferredLanguage=en; Path=/"))
}

/// Resolves the locale for one request, consulting the catalog only when the stored
/// preference is missing or unknown.
///
/// A failed default-language fetch is treated like an invalid value.
pub async fn resolve_for_request(
    catalog: &dyn CatalogApi,
    headers: &HeaderMap,
) -> (Locale, LocaleSource) {
    let stored = stored_preference(headers);
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    if let Some(locale) = stored.as_deref().and_then(|code| code.parse().ok()) {
        return (locale, LocaleSource::Stored);
    }

    let server_default = match catalog.default_language().await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching default language");
            None
        }
    };

    if let Some(code) = server_default.as_deref() {
        if code.parse::<Locale>().is_err() {
            tracing::debug!(code = %code, "Ignoring unknown default language");
        }
    }

    resolve_locale(stored.as_deref(), server_default.as_deref(), accept_language)
}
