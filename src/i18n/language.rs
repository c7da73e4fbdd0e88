//! Language type: validated member of the closed set of supported languages.
//!
//! A `Language` can only be obtained through the registry, so any value that
//! reaches a caller is guaranteed to be one of the nine supported codes.

use crate::i18n::{CountryCode, LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use std::fmt;

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// Internal language code (e.g., "en", "ch")
    code: &'static str,
}

impl Language {
    pub const FRENCH: Language = Language { code: "fr" };
    pub const ENGLISH: Language = Language { code: "en" };
    pub const SPANISH: Language = Language { code: "es" };
    pub const GERMAN: Language = Language { code: "de" };
    pub const RUSSIAN: Language = Language { code: "ru" };
    pub const PORTUGUESE: Language = Language { code: "pt" };
    pub const CHINESE: Language = Language { code: "ch" };
    pub const HINDI: Language = Language { code: "hi" };
    pub const ARABIC: Language = Language { code: "ar" };

    /// Create a Language from an exact internal code.
    ///
    /// # Arguments
    /// * `code` - The internal language code (e.g., "en", "ch")
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is one of the supported languages
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Lenient lookup used for URL segments and client locale prefixes.
    ///
    /// Case-insensitive, and maps the ISO code `zh` to the internal `ch`.
    pub fn normalize(raw: &str) -> Option<Language> {
        let lower = raw.trim().to_ascii_lowercase();
        let code = match lower.as_str() {
            "zh" => "ch",
            other => other,
        };
        Language::from_code(code).ok()
    }

    /// Get the canonical (global default) language.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// All supported languages in registry order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// Get the internal language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Registry entry for this language.
    pub fn config(&self) -> &'static LanguageConfig {
        let registry = LanguageRegistry::get();
        // Every constructor goes through the registry, so the lookup only
        // misses if a constant drifts from the table.
        registry
            .get_by_code(self.code)
            .unwrap_or_else(|| registry.canonical())
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Country assumed for this language when no other signal exists.
    pub fn default_country(&self) -> CountryCode {
        CountryCode::parse(self.config().default_country).unwrap_or(CountryCode::US)
    }

    /// Language subtag for CLDR lookups (`ch` is `zh` outside this crate).
    pub fn bcp47_code(&self) -> &'static str {
        match self.code {
            "ch" => "zh",
            other => other,
        }
    }

    /// Check if this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_constants_match_registry() {
        let constants = [
            Language::FRENCH,
            Language::ENGLISH,
            Language::SPANISH,
            Language::GERMAN,
            Language::RUSSIAN,
            Language::PORTUGUESE,
            Language::CHINESE,
            Language::HINDI,
            Language::ARABIC,
        ];
        assert_eq!(constants.to_vec(), Language::all());
    }

    #[test]
    fn test_english_is_canonical() {
        assert!(Language::ENGLISH.is_canonical());
        assert!(!Language::FRENCH.is_canonical());
        assert_eq!(Language::canonical(), Language::ENGLISH);
        assert_eq!(Language::default(), Language::ENGLISH);
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_valid() {
        let language = Language::from_code("de").expect("Should succeed");
        assert_eq!(language, Language::GERMAN);
        assert_eq!(language.name(), "German");
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("it");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_is_exact() {
        assert!(Language::from_code("EN").is_err());
        assert!(Language::from_code("zh").is_err());
        assert!(Language::from_code("").is_err());
    }

    // ==================== normalize Tests ====================

    #[test]
    fn test_normalize_maps_zh_to_chinese() {
        assert_eq!(Language::normalize("zh"), Some(Language::CHINESE));
        assert_eq!(Language::normalize("ZH"), Some(Language::CHINESE));
        assert_eq!(Language::normalize("ch"), Some(Language::CHINESE));
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(Language::normalize("Pt"), Some(Language::PORTUGUESE));
        assert_eq!(Language::normalize(" ar "), Some(Language::ARABIC));
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert_eq!(Language::normalize("xx"), None);
        assert_eq!(Language::normalize(""), None);
    }

    // ==================== Metadata Tests ====================

    #[test]
    fn test_default_country() {
        assert_eq!(Language::ENGLISH.default_country().as_str(), "US");
        assert_eq!(Language::CHINESE.default_country().as_str(), "CN");
        assert_eq!(Language::HINDI.default_country().as_str(), "IN");
        assert_eq!(Language::ARABIC.default_country().as_str(), "SA");
    }

    #[test]
    fn test_bcp47_code() {
        assert_eq!(Language::CHINESE.bcp47_code(), "zh");
        assert_eq!(Language::FRENCH.bcp47_code(), "fr");
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::SPANISH.to_string(), "es");
        assert_eq!(format!("{}", Language::CHINESE), "ch");
    }

    #[test]
    fn test_native_name() {
        assert_eq!(Language::SPANISH.native_name(), "Español");
        assert_eq!(Language::RUSSIAN.native_name(), "Русский");
    }
}
