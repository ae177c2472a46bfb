//! Port for localized UI text

#[cfg(test)]
use mockall::automock;

/// Localized text lookup
///
/// Lookups never fail: an unknown language falls back to the default
/// language, and an unknown key falls back to the key itself.
#[cfg_attr(test, automock)]
pub trait TextLookupPort: Send + Sync {
    /// Template for `key` in `language`
    fn text(&self, key: &str, language: &str) -> String;

    /// Language codes with a catalog
    fn supported_languages(&self) -> Vec<String>;

    /// Language used when a user has none or an unsupported one
    fn default_language(&self) -> String;

    /// Whether `language` has a catalog
    fn is_supported(&self, language: &str) -> bool {
        self.supported_languages().iter().any(|l| l == language)
    }
}
