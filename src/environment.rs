//! Runtime signals read without any network access: the resolved timezone and
//! the client's ordered language preferences.
//!
//! Both are traits so detection can be driven by fixed values in tests.

use tracing::debug;

/// Provider of the runtime's IANA timezone identifier (e.g. "Europe/Paris").
pub trait TimezoneSource: Send + Sync {
    fn timezone(&self) -> Option<String>;
}

/// Timezone reported by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimezone;

impl TimezoneSource for SystemTimezone {
    fn timezone(&self) -> Option<String> {
        match iana_time_zone::get_timezone() {
            Ok(tz) => Some(tz),
            Err(e) => {
                debug!("System timezone unavailable: {}", e);
                None
            }
        }
    }
}

/// Fixed timezone, or none at all.
#[derive(Debug, Default, Clone)]
pub struct FixedTimezone(pub Option<String>);

impl FixedTimezone {
    pub fn new(tz: &str) -> Self {
        Self(Some(tz.to_string()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TimezoneSource for FixedTimezone {
    fn timezone(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Ordered list of client language preferences (most preferred first),
/// as BCP 47-ish tags such as "fr-FR" or "en_US.UTF-8".
pub trait ClientLanguages: Send + Sync {
    fn languages(&self) -> Vec<String>;
}

/// Language preferences reported by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLanguages;

impl ClientLanguages for SystemLanguages {
    fn languages(&self) -> Vec<String> {
        sys_locale::get_locales().collect()
    }
}

/// Fixed preference list.
#[derive(Debug, Default, Clone)]
pub struct FixedLanguages(pub Vec<String>);

impl FixedLanguages {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }
}

impl ClientLanguages for FixedLanguages {
    fn languages(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Primary language subtag of a locale tag, lowercased.
///
/// Examples: "pt-BR" -> "pt", "en_US.UTF-8" -> "en", "ZH" -> "zh".
pub fn primary_subtag(tag: &str) -> Option<String> {
    let primary = tag.trim().split(['-', '_', '.', '@']).next()?;
    if primary.len() == 2 && primary.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(primary.to_ascii_lowercase())
    } else {
        None
    }
}
