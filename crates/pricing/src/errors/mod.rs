//! Error types for the pricing crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while resolving a USD rate.
///
/// The `Lookup` variant wraps any failure that happened after a cache miss
/// and carries the cache key (`canonicalID_date`) for diagnostics, so that
/// callers can report which (currency, day) pair failed without parsing
/// messages.
#[derive(Error, Debug)]
pub enum PricingError {
    /// A network error occurred while communicating with the pricing service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The pricing service answered with a non-success status.
    #[error("Unexpected status from pricing service: {status}")]
    UnexpectedStatus {
        /// HTTP status returned by the service
        status: reqwest::StatusCode,
    },

    /// The response decoded, but carried no usd rate for the requested id.
    #[error("No usd rate in response for id: {id}")]
    MissingUsdRate {
        /// The canonical identifier that was requested
        id: String,
    },

    /// The service returned a rate that cannot be represented as a decimal.
    #[error("Rate {value} for id {id} is not representable as a decimal")]
    InvalidRate {
        /// The canonical identifier that was requested
        id: String,
        /// The raw rate value from the response
        value: f64,
    },

    /// The rate limiter could not admit the call within its deadline.
    /// This indicates a wedged pipeline, not a bad record.
    #[error("Rate limiter admission deadline exceeded after {waited:?}")]
    AdmitDeadline {
        /// How long the caller was suspended before giving up
        waited: Duration,
    },

    /// A rate lookup failed after a cache miss.
    #[error("Rate lookup failed for {cache_key}: {source}")]
    Lookup {
        /// The cache key (`canonicalID_date`) that was being resolved
        cache_key: String,
        /// The underlying cause
        source: Box<PricingError>,
    },
}

impl PricingError {
    /// True when this error (or its wrapped cause) is an admission deadline.
    ///
    /// Callers use this to distinguish the operational wedged-limiter
    /// condition from per-record lookup failures.
    pub fn is_admit_deadline(&self) -> bool {
        match self {
            Self::AdmitDeadline { .. } => true,
            Self::Lookup { source, .. } => source.is_admit_deadline(),
            _ => false,
        }
    }
}

/// Errors that can occur while loading the symbol map.
///
/// These are configuration failures: an unreadable or malformed symbol map
/// aborts the whole run before any record is processed.
#[derive(Error, Debug)]
pub enum SymbolMapError {
    /// The symbol map source could not be read.
    #[error("Failed to read symbol map: {0}")]
    Io(#[from] std::io::Error),

    /// The symbol map is not a valid JSON object of string to string.
    #[error("Symbol map is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_deadline_is_detected() {
        let error = PricingError::AdmitDeadline {
            waited: Duration::from_secs(180),
        };
        assert!(error.is_admit_deadline());
    }

    #[test]
    fn test_admit_deadline_is_detected_through_lookup() {
        let error = PricingError::Lookup {
            cache_key: "ethereum_2024-01-15".to_string(),
            source: Box::new(PricingError::AdmitDeadline {
                waited: Duration::from_secs(180),
            }),
        };
        assert!(error.is_admit_deadline());
    }

    #[test]
    fn test_other_errors_are_not_admit_deadline() {
        let error = PricingError::MissingUsdRate {
            id: "ethereum".to_string(),
        };
        assert!(!error.is_admit_deadline());

        let error = PricingError::Lookup {
            cache_key: "ethereum_2024-01-15".to_string(),
            source: Box::new(PricingError::MissingUsdRate {
                id: "ethereum".to_string(),
            }),
        };
        assert!(!error.is_admit_deadline());
    }

    #[test]
    fn test_lookup_display_carries_cache_key() {
        let error = PricingError::Lookup {
            cache_key: "ethereum_2024-01-15".to_string(),
            source: Box::new(PricingError::MissingUsdRate {
                id: "ethereum".to_string(),
            }),
        };
        let message = format!("{}", error);
        assert!(message.contains("ethereum_2024-01-15"));
        assert!(message.contains("No usd rate"));
    }
}
