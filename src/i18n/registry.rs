//! The nine languages the engine can surface, with their display names and
//! the country assumed for each when no geolocation signal exists.

use std::sync::OnceLock;

/// Metadata of one supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Internal language code (e.g., "en", "fr", "ch")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "French", "Chinese")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Français", "中文")
    pub native_name: &'static str,

    /// Uppercase country code used when nothing better is known
    pub default_country: &'static str,

    /// Whether this is the global default language (only one should be true)
    pub is_canonical: bool,
}

/// Read-only view over [`LANGUAGES`].
///
/// `list_all` returns languages in declaration order, which is also the
/// order offered to users.
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
    canonical: usize,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: LANGUAGES,
            canonical: LANGUAGES
                .iter()
                .position(|lang| lang.is_canonical)
                .unwrap_or(0),
        })
    }

    /// Exact, case-sensitive lookup by internal code.
    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn list_all(&self) -> Vec<&'static LanguageConfig> {
        self.languages.iter().collect()
    }

    /// The global default language (English).
    pub fn canonical(&self) -> &'static LanguageConfig {
        &self.languages[self.canonical]
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

const fn language(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    default_country: &'static str,
) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        native_name,
        default_country,
        is_canonical: false,
    }
}

/// Supported languages.
///
/// Chinese uses the internal code `ch`; the ISO code `zh` is only accepted as
/// an input alias (see `Language::normalize`).
pub const LANGUAGES: &[LanguageConfig] = &[
    language("fr", "French", "Français", "FR"),
    LanguageConfig {
        is_canonical: true,
        ..language("en", "English", "English", "US")
    },
    language("es", "Spanish", "Español", "ES"),
    language("de", "German", "Deutsch", "DE"),
    language("ru", "Russian", "Русский", "RU"),
    language("pt", "Portuguese", "Português", "PT"),
    language("ch", "Chinese", "中文", "CN"),
    language("hi", "Hindi", "हिन्दी", "IN"),
    language("ar", "Arabic", "العربية", "SA"),
];
