//! Run summary models.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::transform::FailureKind;

/// Per-class failure counts for one run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FailureBreakdown {
    pub decode: usize,
    pub timestamp: usize,
    pub amount: usize,
    pub unmapped_symbol: usize,
    pub rate_resolution: usize,
}

impl FailureBreakdown {
    /// Count one classified failure.
    pub fn record(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::Decode => self.decode += 1,
            FailureKind::Timestamp => self.timestamp += 1,
            FailureKind::Amount => self.amount += 1,
            FailureKind::UnmappedSymbol => self.unmapped_symbol += 1,
            FailureKind::RateResolution => self.rate_resolution += 1,
        }
    }

    /// Total failed records across all classes.
    pub fn total(&self) -> usize {
        self.decode + self.timestamp + self.amount + self.unmapped_symbol + self.rate_resolution
    }
}

/// Aggregate statistics for one pipeline run.
///
/// The rate cache snapshot is included so operators can audit which
/// external calls a run made.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    /// Records seen, including unreadable ones.
    pub total: usize,
    /// Records successfully transformed and handed to the sinks.
    pub transformed: usize,
    /// Failure counts by class.
    pub failed: FailureBreakdown,
    /// Full rate cache contents at end of run.
    pub rate_cache: HashMap<String, Decimal>,
}
