//! `/<lang>-<country>/...` path prefixes.
//!
//! Parsing is pure. Building a token consults only synchronous signals
//! (geo cache, then runtime timezone) and never the network.

use crate::environment::TimezoneSource;
use crate::geo_cache::GeoCache;
use crate::i18n::{country_for_timezone, CountryCode, Language};
use crate::resolver::CountryResolver;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

static LOCALE_PATH_REGEX: OnceLock<Regex> = OnceLock::new();
static LOCALE_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
static LOCALE_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static LEGACY_PATH_REGEX: OnceLock<Regex> = OnceLock::new();
static LEGACY_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_path_regex() -> &'static Regex {
    LOCALE_PATH_REGEX.get_or_init(|| Regex::new(r"^/([a-z]{2})-([a-z]{2})(/.*)?$").unwrap())
}

fn locale_prefix_regex() -> &'static Regex {
    LOCALE_PREFIX_REGEX.get_or_init(|| Regex::new(r"^/[a-z]{2}-[a-z]{2}(/|$)").unwrap())
}

fn locale_token_regex() -> &'static Regex {
    LOCALE_TOKEN_REGEX.get_or_init(|| Regex::new(r"^([a-z]{2})-([a-z]{2})$").unwrap())
}

fn legacy_path_regex() -> &'static Regex {
    LEGACY_PATH_REGEX.get_or_init(|| Regex::new(r"^/([a-z]{2})(/.*)?$").unwrap())
}

fn legacy_prefix_regex() -> &'static Regex {
    LEGACY_PREFIX_REGEX.get_or_init(|| Regex::new(r"^/[a-z]{2}(/|$)").unwrap())
}

/// Result of splitting a locale prefix off a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocale {
    /// Token exactly as written in the URL, e.g. "zh-cn".
    pub locale: Option<String>,
    /// Normalized language ("zh" becomes Chinese).
    pub lang: Option<Language>,
    pub country: Option<String>,
    pub path_without_locale: String,
}

impl ParsedLocale {
    fn unmatched(path: &str) -> Self {
        Self {
            locale: None,
            lang: None,
            country: None,
            path_without_locale: path.to_string(),
        }
    }
}

/// Redirect for a language-only prefix such as `/es/cookies`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRedirect {
    pub should_redirect: bool,
    pub new_path: Option<String>,
    pub detected_lang: Option<Language>,
}

impl LegacyRedirect {
    fn none() -> Self {
        Self {
            should_redirect: false,
            new_path: None,
            detected_lang: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct RouteLocaleCodec {
    cache: Option<Arc<dyn GeoCache>>,
    timezone: Option<Arc<dyn TimezoneSource>>,
}

impl RouteLocaleCodec {
    /// Codec without geo signals; countries come from the language table.
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Codec reading the resolver's geo cache and timezone source.
    pub fn from_resolver(resolver: &CountryResolver) -> Self {
        Self {
            cache: Some(resolver.cache()),
            timezone: Some(resolver.timezone_source()),
        }
    }

    pub fn parse_locale_from_path(&self, path: &str) -> ParsedLocale {
        let Some(caps) = locale_path_regex().captures(path) else {
            return ParsedLocale::unmatched(path);
        };

        let url_lang = &caps[1];
        let Some(lang) = Language::normalize(url_lang) else {
            debug!("Unsupported language prefix in {:?}", path);
            return ParsedLocale::unmatched(path);
        };

        ParsedLocale {
            locale: Some(format!("{}-{}", url_lang, &caps[2])),
            lang: Some(lang),
            country: Some(caps[2].to_string()),
            path_without_locale: caps
                .get(3)
                .map(|rest| rest.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
        }
    }

    /// Build a lowercase `<lang>-<country>` token.
    ///
    /// Country: explicit (when well-formed), cached geo result, timezone,
    /// then the language's default country.
    pub fn get_locale_string(&self, lang: Language, country: Option<&str>) -> String {
        let country = country
            .and_then(CountryCode::parse)
            .or_else(|| self.geo_country())
            .unwrap_or_else(|| lang.default_country());
        format!("{}-{}", lang.code(), country.to_lowercase())
    }

    fn geo_country(&self) -> Option<CountryCode> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.get())
            .or_else(|| {
                self.timezone
                    .as_ref()
                    .and_then(|source| source.timezone())
                    .and_then(|tz| country_for_timezone(&tz))
            })
    }

    pub fn has_locale_prefix(&self, path: &str) -> bool {
        locale_prefix_regex().is_match(path)
    }

    /// Locale token in `path`, or a freshly built one for `default_lang`.
    pub fn get_locale_from_path(&self, path: &str, default_lang: Language) -> String {
        self.parse_locale_from_path(path)
            .locale
            .unwrap_or_else(|| self.get_locale_string(default_lang, None))
    }

    /// Language-only prefix (`/es`, `/es/...`) without a country part.
    pub fn has_legacy_locale_prefix(&self, path: &str) -> bool {
        legacy_prefix_regex().is_match(path) && !self.has_locale_prefix(path)
    }

    /// Token of every supported language, built like [`Self::get_locale_string`]
    /// with no explicit country.
    pub fn supported_locales(&self) -> Vec<String> {
        Language::all()
            .into_iter()
            .map(|lang| self.get_locale_string(lang, None))
            .collect()
    }

    pub fn parse_legacy_locale_from_path(&self, path: &str) -> LegacyRedirect {
        let Some(caps) = legacy_path_regex().captures(path) else {
            return LegacyRedirect::none();
        };

        let Some(lang) = Language::normalize(&caps[1]) else {
            return LegacyRedirect::none();
        };

        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let new_path = format!("/{}{}", self.get_locale_string(lang, None), rest);
        debug!("Legacy locale path {:?} -> {:?}", path, new_path);

        LegacyRedirect {
            should_redirect: true,
            new_path: Some(new_path),
            detected_lang: Some(lang),
        }
    }
}

/// Whether `token` is `<lang>-<country>` with a supported language code.
pub fn is_valid_locale(token: &str) -> bool {
    locale_token_regex()
        .captures(token)
        .map(|caps| Language::from_code(&caps[1]).is_ok())
        .unwrap_or(false)
}

pub fn supported_languages() -> Vec<Language> {
    Language::all()
}
