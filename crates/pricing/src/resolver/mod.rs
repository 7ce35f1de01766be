//! Rate resolution: cache + limiter + provider composed into one lookup.
//!
//! This module contains:
//! - `RateCache` - run-scoped (id, date) -> USD rate cache
//! - `SlidingWindowLimiter` - admission gate for external calls
//! - `RateResolver` - the composition the record transformer calls

mod cache;
mod limiter;

// Re-exports
pub use cache::RateCache;
pub use limiter::{RateLimitConfig, SlidingWindowLimiter};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::errors::PricingError;
use crate::provider::PriceProvider;

/// Cache key for one (currency, day) rate: `canonicalID_date`.
pub fn cache_key(symbol_id: &str, date: NaiveDate) -> String {
    format!("{}_{}", symbol_id, date.format("%Y-%m-%d"))
}

/// Resolves the USD rate for a (canonical id, date) pair.
///
/// A cache hit returns immediately with no limiter interaction and no
/// external call. A miss coalesces concurrent requests for the same key
/// onto one external call: the first caller fetches while the others wait
/// on a per-key lock and then read the cached result. Failed lookups are
/// never cached, so a later record for the same key retries the call (and
/// consumes quota again).
pub struct RateResolver {
    provider: Arc<dyn PriceProvider>,
    limiter: SlidingWindowLimiter,
    cache: RateCache,
    /// Per-key in-flight markers enforcing at most one fetch per key.
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl RateResolver {
    /// Create a resolver around a provider and a limiter.
    ///
    /// Both the cache and the limiter state are owned by this instance and
    /// reset with it; there is no cross-run persistence.
    pub fn new(provider: Arc<dyn PriceProvider>, limiter: SlidingWindowLimiter) -> Self {
        Self {
            provider,
            limiter,
            cache: RateCache::new(),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Convenience constructor with a limiter built from config.
    pub fn with_config(provider: Arc<dyn PriceProvider>, config: RateLimitConfig) -> Self {
        Self::new(provider, SlidingWindowLimiter::new(config))
    }

    fn lock_inflight(&self) -> MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
        self.inflight.lock().unwrap_or_else(|poisoned| {
            warn!("Rate resolver in-flight map mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut inflight = self.lock_inflight();
        inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Resolve the USD rate of 1 unit of `symbol_id` on `date`.
    pub async fn usd_rate(&self, symbol_id: &str, date: NaiveDate) -> Result<Decimal, PricingError> {
        let key = cache_key(symbol_id, date);

        if let Some(rate) = self.cache.get(&key) {
            return Ok(rate);
        }

        let key_lock = self.key_lock(&key);
        let _guard = key_lock.lock().await;

        // Another caller may have completed the fetch while we waited.
        if let Some(rate) = self.cache.get(&key) {
            return Ok(rate);
        }

        if let Err(err) = self.limiter.admit().await {
            return Err(PricingError::Lookup {
                cache_key: key,
                source: Box::new(err),
            });
        }

        match self.provider.usd_rate(symbol_id, date).await {
            Ok(rate) => {
                self.cache.insert(&key, rate);
                Ok(rate)
            }
            Err(err) => Err(PricingError::Lookup {
                cache_key: key,
                source: Box::new(err),
            }),
        }
    }

    /// Full contents of the rate cache, for the end-of-run audit dump.
    pub fn cache_snapshot(&self) -> HashMap<String, Decimal> {
        self.cache.snapshot()
    }
}
