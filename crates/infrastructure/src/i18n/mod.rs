//! Localized UI text catalog
//!
//! Catalogs are flat TOML tables (`key = "text"`), one per language. The
//! four shipped catalogs are embedded at compile time; additional or
//! replacement catalogs can be loaded from a directory of `<lang>.toml`
//! files.
//!
//! Lookup falls back from the requested language to the default language,
//! then to the key itself.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use application::ports::TextLookupPort;
use thiserror::Error;
use tracing::{debug, info, warn};

const EMBEDDED: [(&str, &str); 4] = [
    ("en", include_str!("../../locales/en.toml")),
    ("es", include_str!("../../locales/es.toml")),
    ("fr", include_str!("../../locales/fr.toml")),
    ("de", include_str!("../../locales/de.toml")),
];

/// Error type for catalog loading
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog file is not valid TOML or not a flat string table
    #[error("Invalid catalog for '{language}': {source}")]
    Parse {
        language: String,
        #[source]
        source: toml::de::Error,
    },

    /// The default language has no catalog
    #[error("No catalog for default language '{0}'")]
    MissingDefault(String),

    /// Reading a catalog directory failed
    #[error("Failed to read catalogs: {0}")]
    Io(#[from] std::io::Error),
}

type Entries = HashMap<String, String>;

/// Text catalog keyed by language code
#[derive(Debug, Clone)]
pub struct TextCatalog {
    languages: BTreeMap<String, Entries>,
    default_language: String,
}

impl TextCatalog {
    /// Catalog built from the embedded locales
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingDefault` if `default_language` is not
    /// one of the embedded languages.
    pub fn embedded(default_language: &str) -> Result<Self, CatalogError> {
        Self::from_sources(EMBEDDED, default_language)
    }

    /// Catalog built from `(language, toml)` pairs
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails to parse or the default language
    /// has no catalog.
    pub fn from_sources<'a, I>(sources: I, default_language: &str) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut languages = BTreeMap::new();
        for (language, source) in sources {
            languages.insert(language.to_string(), parse(language, source)?);
        }

        let catalog = Self {
            languages,
            default_language: default_language.to_string(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Merge `<lang>.toml` files from `dir` over the current catalogs
    ///
    /// Keys in a file replace the same keys of that language; languages not
    /// yet known are added.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a file fails to
    /// parse.
    pub fn with_overrides_from(mut self, dir: &Path) -> Result<Self, CatalogError> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let source = std::fs::read_to_string(&path)?;
            let entries = parse(language, &source)?;
            debug!(language, keys = entries.len(), path = %path.display(), "Loaded catalog override");
            self.languages
                .entry(language.to_string())
                .or_default()
                .extend(entries);
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let Some(default) = self.languages.get(&self.default_language) else {
            return Err(CatalogError::MissingDefault(self.default_language.clone()));
        };

        for (language, entries) in &self.languages {
            let missing = default.keys().filter(|k| !entries.contains_key(*k)).count();
            if missing > 0 {
                warn!(language = %language, missing, "Catalog is missing keys, default language will be used");
            }
        }

        info!(
            languages = self.languages.len(),
            default = %self.default_language,
            "Text catalog ready"
        );
        Ok(())
    }
}

fn parse(language: &str, source: &str) -> Result<Entries, CatalogError> {
    toml::from_str(source).map_err(|source| CatalogError::Parse {
        language: language.to_string(),
        source,
    })
}

impl TextLookupPort for TextCatalog {
    fn text(&self, key: &str, language: &str) -> String {
        self.languages
            .get(language)
            .and_then(|entries| entries.get(key))
            .or_else(|| {
                self.languages
                    .get(&self.default_language)
                    .and_then(|entries| entries.get(key))
            })
            .map_or_else(|| key.to_string(), Clone::clone)
    }

    fn supported_languages(&self) -> Vec<String> {
        self.languages.keys().cloned().collect()
    }

    fn default_language(&self) -> String {
        self.default_language.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn embedded_catalogs_load() {
        let catalog = TextCatalog::embedded("en").unwrap();
        assert_eq!(catalog.supported_languages(), vec!["de", "en", "es", "fr"]);
        assert_eq!(catalog.default_language(), "en");
        assert!(catalog.is_supported("fr"));
        assert!(!catalog.is_supported("jp"));
    }

    #[test]
    fn embedded_catalogs_share_keys() {
        let catalog = TextCatalog::embedded("en").unwrap();
        let keys = |lang: &str| -> HashSet<String> {
            catalog.languages[lang].keys().cloned().collect()
        };
        let english = keys("en");
        for lang in ["es", "fr", "de"] {
            assert_eq!(keys(lang), english, "key mismatch in {lang}");
        }
    }

    #[test]
    fn looks_up_translations() {
        let catalog = TextCatalog::embedded("en").unwrap();
        assert_eq!(catalog.text("current_weather", "en"), "Current Weather");
        assert_eq!(catalog.text("current_weather", "es"), "Clima Actual");
        assert_eq!(catalog.text("current_weather", "de"), "Aktuelles Wetter");
        assert_eq!(catalog.text("error_occurred", "fr"), "Une erreur s'est produite");
    }

    #[test]
    fn unknown_language_uses_default() {
        let catalog = TextCatalog::embedded("es").unwrap();
        assert_eq!(catalog.text("humidity", "jp"), "Humedad");
    }

    #[test]
    fn unknown_key_returns_key() {
        let catalog = TextCatalog::embedded("en").unwrap();
        assert_eq!(catalog.text("no_such_key", "de"), "no_such_key");
    }

    #[test]
    fn partial_catalog_falls_back_per_key() {
        let catalog = TextCatalog::from_sources(
            [("en", "wind = \"Wind\"\nhumidity = \"Humidity\""), ("it", "wind = \"Vento\"")],
            "en",
        )
        .unwrap();
        assert_eq!(catalog.text("wind", "it"), "Vento");
        assert_eq!(catalog.text("humidity", "it"), "Humidity");
    }

    #[test]
    fn missing_default_is_an_error() {
        let result = TextCatalog::from_sources([("en", "a = \"b\"")], "pt");
        assert!(matches!(result, Err(CatalogError::MissingDefault(lang)) if lang == "pt"));
    }

    #[test]
    fn invalid_toml_names_language() {
        let result = TextCatalog::from_sources([("en", "a = [1, 2]")], "en");
        assert!(matches!(result, Err(CatalogError::Parse { language, .. }) if language == "en"));
    }

    #[test]
    fn overrides_replace_and_add() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.toml"), "refresh = \"Reload\"").unwrap();
        std::fs::write(dir.path().join("it.toml"), "wind = \"Vento\"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = TextCatalog::embedded("en")
            .unwrap()
            .with_overrides_from(dir.path())
            .unwrap();

        assert_eq!(catalog.text("refresh", "en"), "Reload");
        assert_eq!(catalog.text("wind", "en"), "Wind");
        assert_eq!(catalog.text("wind", "it"), "Vento");
        assert!(catalog.is_supported("it"));
    }
}
