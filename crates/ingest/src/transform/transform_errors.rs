//! Transform error types and failure classification.

use std::fmt;

use thiserror::Error;

use blockdata_pricing::PricingError;

/// Which JSON blob of the raw record failed to decode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Blob {
    Props,
    Nums,
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blob::Props => write!(f, "props"),
            Blob::Nums => write!(f, "nums"),
        }
    }
}

/// Errors that can occur while transforming one raw record.
///
/// Each variant is classified into a [`FailureKind`] via the
/// [`kind`](Self::kind) method, which the pipeline driver uses for the
/// per-class failure breakdown in the run summary. Any variant aborts only
/// its own record.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The record is missing a field position fixed by upstream contract.
    #[error("Record is missing expected field at position {index}")]
    MissingField {
        /// The absent field position
        index: usize,
    },

    /// A JSON blob on the record failed to decode.
    #[error("Failed to decode {blob} blob: {source}")]
    Decode {
        /// Which blob failed
        blob: Blob,
        /// The decode failure
        source: serde_json::Error,
    },

    /// The timestamp field does not match the fixed expected format.
    #[error("Failed to parse timestamp '{raw}': {source}")]
    Timestamp {
        /// The raw timestamp text
        raw: String,
        /// The parse failure
        source: chrono::ParseError,
    },

    /// The currency amount is not parseable as a decimal.
    #[error("Failed to parse currency amount '{raw}': {source}")]
    Amount {
        /// The raw amount text
        raw: String,
        /// The parse failure
        source: rust_decimal::Error,
    },

    /// The currency symbol is absent from the symbol map.
    #[error("Currency symbol not mapped: {symbol}")]
    UnmappedSymbol {
        /// The unresolved symbol (lower-cased)
        symbol: String,
    },

    /// The USD rate could not be resolved for the record's (symbol, date).
    #[error("Rate resolution failed for {cache_key}: {source}")]
    RateResolution {
        /// The cache key that was being resolved
        cache_key: String,
        /// The pricing failure
        source: PricingError,
    },
}

/// Classification of a transform failure, used for the run summary.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FailureKind {
    /// Malformed record: unreadable row, missing field, or bad JSON blob.
    Decode,
    /// Timestamp did not match the expected format.
    Timestamp,
    /// Currency amount was not a parseable decimal.
    Amount,
    /// Currency symbol absent from the symbol map.
    UnmappedSymbol,
    /// External rate lookup failed.
    RateResolution,
}

impl TransformError {
    /// Returns the failure classification for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingField { .. } | Self::Decode { .. } => FailureKind::Decode,
            Self::Timestamp { .. } => FailureKind::Timestamp,
            Self::Amount { .. } => FailureKind::Amount,
            Self::UnmappedSymbol { .. } => FailureKind::UnmappedSymbol,
            Self::RateResolution { .. } => FailureKind::RateResolution,
        }
    }

    /// True when the failure indicates the pipeline itself is wedged (the
    /// rate limiter could not admit within its deadline), rather than a bad
    /// record. The driver stops issuing new records on this condition.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::RateResolution { source, .. } if source.is_admit_deadline())
    }
}
