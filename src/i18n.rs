//! # Localization Lookup
//!
//! Mappa una coppia (lingua, chiave) a una stringa visualizzabile.
//!
//! ## Responsabilità:
//! - Tabelle di traduzione embedded nel binario (`locales/<codice>.json`)
//! - Fallback: lingua corrente → inglese → chiave stessa
//! - Sostituzione dei placeholder `{nome}` nelle stringhe
//!
//! ## Lingue supportate:
//! en, de, fr, zh, ja, vi, th

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::warn;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Supported language codes with their native display names
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("de", "Deutsch"),
    ("fr", "Français"),
    ("zh", "中文"),
    ("ja", "日本語"),
    ("vi", "Tiếng Việt"),
    ("th", "ไทย"),
];

const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.json")),
    ("de", include_str!("../locales/de.json")),
    ("fr", include_str!("../locales/fr.json")),
    ("zh", include_str!("../locales/zh.json")),
    ("ja", include_str!("../locales/ja.json")),
    ("vi", include_str!("../locales/vi.json")),
    ("th", include_str!("../locales/th.json")),
];

/// language code -> (key -> text)
pub type TranslationTables = HashMap<String, HashMap<String, String>>;

pub fn is_supported_language(code: &str) -> bool {
    LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Native name of a language, English for unknown codes
pub fn language_name(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}

fn embedded_tables() -> Arc<TranslationTables> {
    static TABLES: OnceLock<Arc<TranslationTables>> = OnceLock::new();
    TABLES
        .get_or_init(|| {
            let mut tables = TranslationTables::new();
            for (code, raw) in EMBEDDED {
                match serde_json::from_str::<HashMap<String, String>>(raw) {
                    Ok(table) => {
                        tables.insert(code.to_string(), table);
                    }
                    Err(e) => warn!("Error loading translations for {}: {}", code, e),
                }
            }
            Arc::new(tables)
        })
        .clone()
}

/// Resolves display strings for one language
#[derive(Debug, Clone)]
pub struct Localizer {
    language: String,
    tables: Arc<TranslationTables>,
}

impl Localizer {
    /// Localizer over the embedded tables; unknown languages use the default
    pub fn new(language: &str) -> Self {
        Self::with_tables(language, embedded_tables())
    }

    pub fn with_tables(language: &str, tables: Arc<TranslationTables>) -> Self {
        let language = if tables.contains_key(language) {
            language.to_string()
        } else {
            if language != DEFAULT_LANGUAGE {
                warn!("Language '{}' not found, using {}", language, DEFAULT_LANGUAGE);
            }
            DEFAULT_LANGUAGE.to_string()
        };
        Self { language, tables }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translated text for `key`
    pub fn text(&self, key: &str) -> String {
        self.tables
            .get(&self.language)
            .and_then(|table| table.get(key))
            .or_else(|| self.tables.get(DEFAULT_LANGUAGE).and_then(|table| table.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Translated text with `{name}` placeholders substituted
    pub fn format(&self, key: &str, args: &[(&str, String)]) -> String {
        args.iter().fold(self.text(key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    /// (code, native name) pairs for every supported language
    pub fn available_languages() -> &'static [(&'static str, &'static str)] {
        LANGUAGES
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}
