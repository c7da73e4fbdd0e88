//! Locale resolution and formatting.
//!
//! [`CountryResolver`] detects the user's language and country from a saved
//! preference, the runtime timezone, a 24h geo cache and a cascade of public
//! IP geolocation services. [`LocaleFormatter`] renders dates, numbers and
//! currency amounts for the resolved locale, and [`RouteLocaleCodec`] reads
//! and writes `/<lang>-<country>/` path prefixes.

pub mod cascade;
pub mod config;
pub mod environment;
pub mod format;
pub mod geo_cache;
pub mod i18n;
pub mod metrics;
pub mod preference;
pub mod providers;
pub mod resolver;
pub mod route;
pub mod storage;

pub use config::Config;
pub use format::{FormatOptions, LocaleFormatter, PLACEHOLDER};
pub use geo_cache::{GeoCache, StoredGeoCache};
pub use i18n::{CountryCode, Language};
pub use resolver::CountryResolver;
pub use route::RouteLocaleCodec;
