//! URL context passed explicitly into path resolution.

use url::Url;

use filedock_core::config::PresentationConfig;
use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;

/// Where application routes live and which locale to render in.
///
/// Presenters never read ambient request state; hosts build one context per
/// request (or reuse the configured default) and hand it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContext {
    /// Application base URL; route segments are appended to its path.
    pub base_url: Url,
    /// Locale requested by the caller.
    pub locale: String,
    /// Locale consulted when a translation is missing.
    pub fallback_locale: String,
}

impl UrlContext {
    /// Create a context, rejecting base URLs that cannot carry a path.
    pub fn new(
        base_url: Url,
        locale: impl Into<String>,
        fallback_locale: impl Into<String>,
    ) -> AppResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Base URL '{base_url}' cannot carry route paths"
            )));
        }
        Ok(Self {
            base_url,
            locale: locale.into(),
            fallback_locale: fallback_locale.into(),
        })
    }

    /// The default context described by the presentation config.
    pub fn from_config(config: &PresentationConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("presentation.base_url '{}' is not a valid URL", config.base_url),
                e,
            )
        })?;
        Self::new(base_url, &config.default_locale, &config.fallback_locale)
    }

    /// Same context rendered in another locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// `{base}/{route...}/{location segments...}` with every segment
    /// percent-encoded.
    pub(crate) fn route<'a>(
        &self,
        route: &[&str],
        location: impl IntoIterator<Item = &'a str>,
    ) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        // `new` guarantees a base URL, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(route.iter().copied())
                .extend(location);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(base: &str) -> UrlContext {
        UrlContext::new(Url::parse(base).unwrap(), "en", "en").unwrap()
    }

    #[test]
    fn test_route_appends_segments() {
        let url = ctx("http://localhost:8080").route(&["files", "stream", "local"], ["a.txt"]);
        assert_eq!(url.as_str(), "http://localhost:8080/files/stream/local/a.txt");
    }

    #[test]
    fn test_route_keeps_base_path_and_encodes() {
        let url = ctx("https://example.com/app/")
            .route(&["files", "download", "local"], "docs/my report.pdf".split('/'));
        assert_eq!(
            url.as_str(),
            "https://example.com/app/files/download/local/docs/my%20report.pdf"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:files@example.com").unwrap();
        assert!(UrlContext::new(url, "en", "en").is_err());
    }

    #[test]
    fn test_from_config() {
        let ctx = UrlContext::from_config(&PresentationConfig::default()).unwrap();
        assert_eq!(ctx.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(ctx.with_locale("fr").locale, "fr");
    }
}
