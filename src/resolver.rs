//! Layered language/country detection.
//!
//! Language resolution order (first hit wins):
//!
//! 1. Saved preference (synchronous, no I/O beyond storage)
//! 2. Geolocation, itself layered:
//!    timezone inference → geo cache → sequential provider cascade
//! 3. Client language preferences
//! 4. Caller-supplied default
//!
//! Every stage swallows its own errors; the public API never fails.

use crate::cascade::{first_success, Attempt};
use crate::config::Config;
use crate::environment::{
    primary_subtag, ClientLanguages, SystemLanguages, SystemTimezone, TimezoneSource,
};
use crate::geo_cache::{GeoCache, StoredGeoCache};
use crate::i18n::{country_for_timezone, language_for_country, CountryCode, Language};
use crate::metrics::DetectionMetrics;
use crate::preference::PreferenceStore;
use crate::providers::{GeoProvider, ProviderError, DEFAULT_PROVIDER_TIMEOUT};
use crate::storage::{FileStorage, Storage};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LanguageSource {
    SavedPreference,
    Geolocation,
    ClientLanguages,
}

const LANGUAGE_PIPELINE: [LanguageSource; 3] = [
    LanguageSource::SavedPreference,
    LanguageSource::Geolocation,
    LanguageSource::ClientLanguages,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeoSource {
    Timezone,
    Cache,
    Providers,
}

const GEO_PIPELINE: [GeoSource; 3] = [GeoSource::Timezone, GeoSource::Cache, GeoSource::Providers];

/// Detects the user's language and country from progressively slower signals.
pub struct CountryResolver {
    cache: Arc<dyn GeoCache>,
    preferences: PreferenceStore,
    timezone: Arc<dyn TimezoneSource>,
    client_languages: Arc<dyn ClientLanguages>,
    providers: Vec<GeoProvider>,
    http: reqwest::Client,
    provider_timeout: Duration,
    cancel: CancellationToken,
    metrics: Arc<DetectionMetrics>,
}

impl CountryResolver {
    /// Resolver over the given cache and preference store, reading the
    /// system timezone and languages and using the default provider cascade.
    pub fn new(cache: Arc<dyn GeoCache>, preferences: PreferenceStore) -> Self {
        Self {
            cache,
            preferences,
            timezone: Arc::new(SystemTimezone),
            client_languages: Arc::new(SystemLanguages),
            providers: GeoProvider::default_cascade(None),
            http: reqwest::Client::new(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            cancel: CancellationToken::new(),
            metrics: Arc::new(DetectionMetrics::new()),
        }
    }

    /// Resolver backed by a shared storage for both the cache and the preference.
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self::new(
            Arc::new(StoredGeoCache::new(storage.clone())),
            PreferenceStore::new(storage),
        )
    }

    /// Fully wired resolver: file-backed state, system signals, configured providers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::in_dir(&config.state_dir));

        let providers = if config.geo_providers_enabled {
            GeoProvider::default_cascade(config.ipinfo_token.as_deref())
        } else {
            Vec::new()
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("locale-engine/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_storage(storage)
            .with_providers(providers)
            .with_http_client(http)
            .with_provider_timeout(config.provider_timeout))
    }

    pub fn with_timezone_source(mut self, timezone: Arc<dyn TimezoneSource>) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_client_languages(mut self, languages: Arc<dyn ClientLanguages>) -> Self {
        self.client_languages = languages;
        self
    }

    /// Replace the provider cascade. Order is the order of consultation.
    pub fn with_providers(mut self, providers: Vec<GeoProvider>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Token that aborts any in-flight provider cascade when cancelled.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cache(&self) -> Arc<dyn GeoCache> {
        self.cache.clone()
    }

    pub fn timezone_source(&self) -> Arc<dyn TimezoneSource> {
        self.timezone.clone()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn providers(&self) -> &[GeoProvider] {
        &self.providers
    }

    pub fn metrics(&self) -> &DetectionMetrics {
        &self.metrics
    }

    /// Resolve the user's language. Never fails: falls back to `default`.
    pub async fn detect_user_language(&self, default: Language) -> Language {
        for source in LANGUAGE_PIPELINE {
            let detected = match source {
                LanguageSource::SavedPreference => self.get_saved_language(),
                LanguageSource::Geolocation => {
                    self.detect_country().await.and_then(|country| {
                        let language = language_for_country(country);
                        if language.is_none() {
                            debug!("No language mapped for country {}", country);
                        }
                        language
                    })
                }
                LanguageSource::ClientLanguages => self.detect_language_from_browser(),
            };

            if let Some(language) = detected {
                info!("Resolved language {} from {:?}", language, source);
                return language;
            }
        }

        info!("No language signal available, using default {}", default);
        default
    }

    /// Geolocate the user: timezone, then cache, then the provider cascade.
    ///
    /// A timezone or provider hit refreshes the cache.
    pub async fn detect_country(&self) -> Option<CountryCode> {
        for source in GEO_PIPELINE {
            let detected = match source {
                GeoSource::Timezone => {
                    let country = self.detect_country_from_timezone();
                    if let Some(country) = country {
                        self.cache.set(country);
                    }
                    country
                }
                GeoSource::Cache => self.get_cached_geo_data(),
                GeoSource::Providers => {
                    let country = self.query_providers().await;
                    if let Some(country) = country {
                        self.cache.set(country);
                    }
                    country
                }
            };

            if let Some(country) = detected {
                debug!("Geolocated {} via {:?}", country, source);
                return Some(country);
            }
        }

        None
    }

    /// Country implied by the runtime timezone. No network, no cache write.
    pub fn detect_country_from_timezone(&self) -> Option<CountryCode> {
        let Some(timezone) = self.timezone.timezone() else {
            debug!("Timezone unavailable");
            return None;
        };

        match country_for_timezone(&timezone) {
            Some(country) => {
                self.metrics.record_timezone_hit();
                debug!("Timezone {} maps to {}", timezone, country);
                Some(country)
            }
            None => {
                debug!("Timezone {} has no country mapping", timezone);
                None
            }
        }
    }

    /// Unexpired cached country, if any.
    pub fn get_cached_geo_data(&self) -> Option<CountryCode> {
        let cached = self.cache.get();
        if cached.is_some() {
            self.metrics.record_cache_hit();
        } else {
            self.metrics.record_cache_miss();
        }
        cached
    }

    /// First client language whose primary subtag is supported.
    pub fn detect_language_from_browser(&self) -> Option<Language> {
        self.client_languages
            .languages()
            .iter()
            .filter_map(|tag| primary_subtag(tag))
            .find_map(|subtag| Language::normalize(&subtag))
    }

    pub fn get_saved_language(&self) -> Option<Language> {
        self.preferences.load()
    }

    pub fn save_language(&self, language: Language) -> Result<()> {
        self.preferences.save(language)
    }

    pub fn clear_saved_language(&self) -> Result<()> {
        self.preferences.clear()
    }

    async fn query_providers(&self) -> Option<CountryCode> {
        if self.providers.is_empty() {
            return None;
        }

        first_success("Geolocation", self.providers.iter(), |provider| async move {
            self.metrics.record_provider_call();
            match provider
                .lookup_with_timeout(&self.http, self.provider_timeout, &self.cancel)
                .await
            {
                Ok(country) => Attempt::Success(country),
                Err(ProviderError::RateLimited) => {
                    self.metrics.record_provider_rate_limit();
                    Attempt::RateLimited
                }
                Err(ProviderError::Cancelled) => Attempt::Abort("cancelled".to_string()),
                Err(e) => {
                    self.metrics.record_provider_failure();
                    Attempt::Failed(e.to_string())
                }
            }
        })
        .await
    }
}
