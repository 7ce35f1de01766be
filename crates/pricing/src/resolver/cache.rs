//! Run-scoped USD rate cache.
//!
//! Keys are `canonicalID_date` strings; values are USD rates. Entries are
//! added on first resolution and never evicted or expired within a run; the
//! cache is bounded naturally by the number of distinct (symbol, date) pairs
//! in one input, which is small relative to record count.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::warn;
use rust_decimal::Decimal;

/// Thread-safe (key -> USD rate) cache for one pipeline run.
#[derive(Debug, Default)]
pub struct RateCache {
    entries: Mutex<HashMap<String, Decimal>>,
}

impl RateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// A poisoned cache at worst re-issues an external call that another
    /// thread had already completed, which is better than panicking.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, Decimal>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Rate cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up a previously stored rate.
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.lock_entries().get(key).copied()
    }

    /// Store a rate. Later inserts for the same key overwrite.
    pub fn insert(&self, key: &str, rate: Decimal) {
        self.lock_entries().insert(key.to_string(), rate);
    }

    /// Full contents of the cache, for the end-of-run audit dump.
    pub fn snapshot(&self) -> HashMap<String, Decimal> {
        self.lock_entries().clone()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}
