use super::{LinkGenerator, Route};

/// Builds `{base}/{route}/{application}/{file}` URLs.
#[derive(Debug, Clone)]
pub struct UrlLinkGenerator {
    base_url: String,
}

impl UrlLinkGenerator {
    /// Create a generator for the given public base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl LinkGenerator for UrlLinkGenerator {
    fn generate(&self, route: Route, application: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            route.as_str(),
            urlencoding::encode(application),
            urlencoding::encode(file_name)
        )
    }
}
