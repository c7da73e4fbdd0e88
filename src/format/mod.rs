//! Locale-aware rendering of dates, times, numbers and currency amounts.
//!
//! Every operation is total: a value that cannot be rendered produces
//! [`PLACEHOLDER`] instead of an error.
//!
//! # Example
//!
//! ```
//! use locale_engine::format::{FormatOptions, LocaleFormatter};
//! use locale_engine::i18n::Language;
//!
//! let formatter = LocaleFormatter::standalone();
//! let options = FormatOptions::new().language(Language::FRENCH).country("FR");
//! assert_eq!(formatter.format_date("2024-03-15T14:30:00Z", &options), "15/03/2024");
//! ```

mod date_like;
mod number;
mod patterns;

pub use date_like::{to_date, DateLike, FirestoreTimestamp, ToInstant, EPOCH_SECONDS_CUTOFF_MS};
pub use patterns::{date_pattern, uses_twelve_hour_clock, DatePattern};

use crate::environment::TimezoneSource;
use crate::geo_cache::GeoCache;
use crate::i18n::{country_for_timezone, language_for_country, CountryCode, Language};
use crate::preference::PreferenceStore;
use crate::resolver::CountryResolver;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Rendered in place of anything that cannot be formatted.
pub const PLACEHOLDER: &str = "—";

/// Currency used when none is requested.
pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberStyle {
    #[default]
    Decimal,
    /// Value is a ratio; rendered ×100 with a percent sign.
    Percent,
}

/// Per-call overrides. Everything is optional.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub country_code: Option<String>,
    pub language: Option<Language>,
    pub user_country: Option<String>,
    pub min_fraction_digits: Option<usize>,
    pub max_fraction_digits: Option<usize>,
    pub style: NumberStyle,
    pub currency: Option<String>,
    pub time_zone: Option<Tz>,
    pub include_seconds: bool,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(mut self, code: &str) -> Self {
        self.country_code = Some(code.to_string());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn user_country(mut self, code: &str) -> Self {
        self.user_country = Some(code.to_string());
        self
    }

    pub fn fraction_digits(mut self, min: usize, max: usize) -> Self {
        self.min_fraction_digits = Some(min);
        self.max_fraction_digits = Some(max);
        self
    }

    pub fn style(mut self, style: NumberStyle) -> Self {
        self.style = style;
        self
    }

    pub fn currency(mut self, code: &str) -> Self {
        self.currency = Some(code.to_string());
        self
    }

    pub fn time_zone(mut self, tz: Tz) -> Self {
        self.time_zone = Some(tz);
        self
    }

    pub fn with_seconds(mut self) -> Self {
        self.include_seconds = true;
        self
    }
}

/// Formats values for the resolved language and country.
///
/// Country resolution order: explicit option, user country, geo cache,
/// runtime timezone, the language's default country, then US.
/// Language resolution order: explicit option, saved preference, language of
/// the resolved country, then English.
#[derive(Clone)]
pub struct LocaleFormatter {
    cache: Option<Arc<dyn GeoCache>>,
    timezone: Option<Arc<dyn TimezoneSource>>,
    preferences: Option<PreferenceStore>,
    render_zone: Tz,
}

impl LocaleFormatter {
    /// Formatter with no ambient signals, rendering in UTC.
    pub fn standalone() -> Self {
        Self {
            cache: None,
            timezone: None,
            preferences: None,
            render_zone: Tz::UTC,
        }
    }

    /// Formatter sharing the resolver's cache, timezone source and saved
    /// preference. Renders in the runtime timezone when it is a known zone.
    pub fn from_resolver(resolver: &CountryResolver) -> Self {
        let timezone = resolver.timezone_source();
        let render_zone = timezone
            .timezone()
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(Tz::UTC);

        Self {
            cache: Some(resolver.cache()),
            timezone: Some(timezone),
            preferences: Some(resolver.preferences().clone()),
            render_zone,
        }
    }

    /// Default zone for rendering dates and times.
    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.render_zone = tz;
        self
    }

    pub fn time_zone(&self) -> Tz {
        self.render_zone
    }

    pub fn resolve_country(&self, options: &FormatOptions) -> CountryCode {
        let explicit = options.country_code.as_deref().and_then(CountryCode::parse);
        let user = options.user_country.as_deref().and_then(CountryCode::parse);

        explicit
            .or(user)
            .or_else(|| self.cache.as_ref().and_then(|cache| cache.get()))
            .or_else(|| {
                self.timezone
                    .as_ref()
                    .and_then(|source| source.timezone())
                    .and_then(|tz| country_for_timezone(&tz))
            })
            .or_else(|| self.explicit_language(options).map(|l| l.default_country()))
            .unwrap_or(CountryCode::US)
    }

    pub fn resolve_language(&self, options: &FormatOptions) -> Language {
        self.explicit_language(options)
            .or_else(|| language_for_country(self.resolve_country(options)))
            .unwrap_or_else(Language::canonical)
    }

    fn explicit_language(&self, options: &FormatOptions) -> Option<Language> {
        options
            .language
            .or_else(|| self.preferences.as_ref().and_then(|p| p.load()))
    }

    fn render_instant(&self, value: DateLike, options: &FormatOptions, layout: &str) -> String {
        match value.to_instant() {
            Some(instant) => render(instant, options.time_zone.unwrap_or(self.render_zone), layout),
            None => PLACEHOLDER.to_string(),
        }
    }

    fn time_layout(&self, country: CountryCode, options: &FormatOptions) -> &'static str {
        patterns::time_layout(uses_twelve_hour_clock(country), options.include_seconds)
    }

    /// Calendar date, e.g. "15/03/2024" for France.
    pub fn format_date(&self, value: impl Into<DateLike>, options: &FormatOptions) -> String {
        let country = self.resolve_country(options);
        self.render_instant(value.into(), options, date_pattern(country).layout())
    }

    /// Time of day: "14:30" or "2:30 PM" depending on the country's clock.
    pub fn format_time(&self, value: impl Into<DateLike>, options: &FormatOptions) -> String {
        let country = self.resolve_country(options);
        self.render_instant(value.into(), options, self.time_layout(country, options))
    }

    /// Date followed by time, separated by a space.
    pub fn format_date_time(&self, value: impl Into<DateLike>, options: &FormatOptions) -> String {
        let country = self.resolve_country(options);
        let layout = format!(
            "{} {}",
            date_pattern(country).layout(),
            self.time_layout(country, options)
        );
        self.render_instant(value.into(), options, &layout)
    }

    /// Grouped decimal (0-3 fraction digits by default) or percentage.
    pub fn format_number(&self, value: f64, options: &FormatOptions) -> String {
        let country = self.resolve_country(options);
        let language = self.resolve_language(options);
        let locale = number::number_locale(language, country);

        let rendered = match options.style {
            NumberStyle::Decimal => number::format_decimal(
                value,
                &locale,
                options.min_fraction_digits.unwrap_or(0),
                options.max_fraction_digits.unwrap_or(3),
            ),
            NumberStyle::Percent => number::format_decimal(
                value * 100.0,
                &locale,
                options.min_fraction_digits.unwrap_or(0),
                options.max_fraction_digits.unwrap_or(0),
            )
            .map(|n| n + number::percent_suffix(language)),
        };

        rendered.unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    /// Currency amount, EUR unless `options.currency` says otherwise.
    pub fn format_currency(&self, amount: f64, options: &FormatOptions) -> String {
        let code = options
            .currency
            .as_deref()
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if !number::is_currency_code(&code) {
            return PLACEHOLDER.to_string();
        }

        let country = self.resolve_country(options);
        let language = self.resolve_language(options);
        let locale = number::number_locale(language, country);
        let digits = number::currency_digits(&code);

        match number::format_decimal(amount.abs(), &locale, digits, digits) {
            Some(formatted) => {
                let negative = amount < 0.0 && formatted.bytes().any(|b| (b'1'..=b'9').contains(&b));
                number::place_currency(language, negative, number::currency_symbol(&code), &formatted)
            }
            None => PLACEHOLDER.to_string(),
        }
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::standalone()
    }
}

fn render(instant: DateTime<Utc>, zone: Tz, layout: &str) -> String {
    instant.with_timezone(&zone).format(layout).to_string()
}

// --- FREE FUNCTIONS (no ambient signals, UTC) ---

pub fn format_date(value: impl Into<DateLike>, options: &FormatOptions) -> String {
    LocaleFormatter::standalone().format_date(value, options)
}

pub fn format_time(value: impl Into<DateLike>, options: &FormatOptions) -> String {
    LocaleFormatter::standalone().format_time(value, options)
}

pub fn format_date_time(value: impl Into<DateLike>, options: &FormatOptions) -> String {
    LocaleFormatter::standalone().format_date_time(value, options)
}

pub fn format_number(value: f64, options: &FormatOptions) -> String {
    LocaleFormatter::standalone().format_number(value, options)
}

pub fn format_currency(amount: f64, options: &FormatOptions) -> String {
    LocaleFormatter::standalone().format_currency(amount, options)
}
