//! Request locale selection.

/// Outcome of [`resolve_locale`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChoice {
    /// Locale to render the request with.
    pub locale: String,
    /// True when the stored preference must be (re)written.
    pub persist: bool,
}

/// Pick the locale for a request.
///
/// An explicit `?lang=` query value wins over a `lang` route parameter,
/// which wins over the stored preference, which wins over `default`. Blank
/// values count as absent.
pub fn resolve_locale(
    query: Option<&str>,
    route: Option<&str>,
    stored: Option<&str>,
    default: &str,
) -> LocaleChoice {
    let stored = present(stored);

    let locale = present(query)
        .or_else(|| present(route))
        .or(stored)
        .unwrap_or(default)
        .to_string();
    let persist = stored != Some(locale.as_str());

    LocaleChoice { locale, persist }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
