//! Time-boxed cache of the last detected country.
//!
//! The entry is advisory: a missing, expired or corrupted record is simply a
//! miss, and a bad record is deleted as a side effect of reading it.

use crate::i18n::CountryCode;
use crate::storage::Storage;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Storage key of the cache entry.
pub const GEO_CACHE_KEY: &str = "locale.geo_cache";

/// Entries older than this are treated as absent.
pub const GEO_CACHE_TTL_MS: i64 = 86_400_000;

/// Persisted form: `{"countryCode":"FR","timestamp":1710000000000}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedGeoResult {
    pub country_code: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Source of "now", injectable so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

/// Cache of the last successfully detected country.
pub trait GeoCache: Send + Sync {
    /// Valid cached country, or `None` (expired/corrupt entries are purged).
    fn get(&self) -> Option<CountryCode>;

    /// Overwrite the entry with `country` stamped at the current time.
    fn set(&self, country: CountryCode);
}

/// `GeoCache` persisted through a [`Storage`] under [`GEO_CACHE_KEY`].
pub struct StoredGeoCache {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl StoredGeoCache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    fn purge(&self, reason: &str) {
        debug!("Dropping geo cache entry: {}", reason);
        if let Err(e) = self.storage.remove(GEO_CACHE_KEY) {
            debug!("Failed to remove geo cache entry: {:#}", e);
        }
    }
}

impl GeoCache for StoredGeoCache {
    fn get(&self) -> Option<CountryCode> {
        let raw = match self.storage.get(GEO_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!("Geo cache read failed: {:#}", e);
                return None;
            }
        };

        let entry: CachedGeoResult = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(_) => {
                self.purge("unparsable entry");
                return None;
            }
        };

        let Some(country) = CountryCode::parse(&entry.country_code) else {
            self.purge("malformed country code");
            return None;
        };

        let Some(age_ms) = self.clock.now().timestamp_millis().checked_sub(entry.timestamp) else {
            self.purge("bad timestamp");
            return None;
        };
        if age_ms >= GEO_CACHE_TTL_MS {
            self.purge("expired");
            return None;
        }

        Some(country)
    }

    fn set(&self, country: CountryCode) {
        let entry = CachedGeoResult {
            country_code: country.to_string(),
            timestamp: self.clock.now().timestamp_millis(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.storage.set(GEO_CACHE_KEY, &json));
        if let Err(e) = result {
            debug!("Geo cache write failed: {:#}", e);
        }
    }
}
