//! Detection metrics and observability.
//!
//! Counters are kept per resolver (not process-global) so independent
//! resolvers, and tests running in parallel, do not interfere.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct DetectionMetrics {
    /// Country found in the geo cache
    cache_hits: AtomicUsize,

    /// Geo cache consulted but empty/expired
    cache_misses: AtomicUsize,

    /// Country inferred from the runtime timezone
    timezone_hits: AtomicUsize,

    /// Provider requests issued
    provider_calls: AtomicUsize,

    /// Provider requests answered with HTTP 429
    provider_rate_limits: AtomicUsize,

    /// Provider requests that failed for any other reason (incl. timeouts)
    provider_failures: AtomicUsize,
}

impl DetectionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timezone_hit(&self) {
        self.timezone_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_rate_limit(&self) {
        self.provider_rate_limits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn timezone_hits(&self) -> usize {
        self.timezone_hits.load(Ordering::Relaxed)
    }

    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::Relaxed)
    }

    pub fn provider_rate_limits(&self) -> usize {
        self.provider_rate_limits.load(Ordering::Relaxed)
    }

    pub fn provider_failures(&self) -> usize {
        self.provider_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_cache_queries = hits + misses;
        let cache_hit_rate = if total_cache_queries > 0 {
            (hits as f64 / total_cache_queries as f64) * 100.0
        } else {
            0.0
        };

        let calls = self.provider_calls();
        let rate_limits = self.provider_rate_limits();
        let failures = self.provider_failures();
        let provider_success_rate = if calls > 0 {
            (calls.saturating_sub(rate_limits + failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            timezone_hits: self.timezone_hits(),
            provider_calls: calls,
            provider_rate_limits: rate_limits,
            provider_failures: failures,
            provider_success_rate,
        }
    }
}

/// Snapshot of detection statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub timezone_hits: usize,
    pub provider_calls: usize,
    pub provider_rate_limits: usize,
    pub provider_failures: usize,

    /// Share of provider calls that yielded a country, as a percentage (0-100)
    pub provider_success_rate: f64,
}
