//! Locale selection from `?lang=` and the `lang` cookie.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{
        header::{CONTENT_LANGUAGE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use buildshelf_core::resolve_locale;
use tracing::debug;

use crate::state::AppState;

/// Cookie (and query parameter) carrying the preferred locale.
pub const LOCALE_COOKIE: &str = "lang";

/// Locale chosen for the current request, available as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

/// Resolve the request locale from `?lang=`, the `lang` cookie, and the
/// configured default, expose it as a [`Locale`] extension, and echo it in
/// `Content-Language`. An explicit query choice is stored in the cookie.
pub async fn locale_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let query = Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(LOCALE_COOKIE))
        .filter(|value| is_valid_locale(value));
    let stored = cookie_value(req.headers(), LOCALE_COOKIE).filter(|value| is_valid_locale(value));

    let choice = resolve_locale(
        query.as_deref(),
        None,
        stored.as_deref(),
        &state.default_locale,
    );
    debug!(locale = %choice.locale, persist = choice.persist, "resolved request locale");
    req.extensions_mut().insert(Locale(choice.locale.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&choice.locale) {
        response.headers_mut().insert(CONTENT_LANGUAGE, value);
    }
    if choice.persist {
        let cookie = format!("{LOCALE_COOKIE}={}; Path=/; SameSite=Lax", choice.locale);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Language tags only: letters, digits, `-` and `_`.
fn is_valid_locale(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 35
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; lang=de; x=1"));
        assert_eq!(cookie_value(&headers, "lang").as_deref(), Some("de"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn rejects_unsafe_locales() {
        assert!(is_valid_locale("pt-BR"));
        assert!(is_valid_locale("zh_Hans"));
        assert!(!is_valid_locale(""));
        assert!(!is_valid_locale("en; Path=/evil"));
    }
}
