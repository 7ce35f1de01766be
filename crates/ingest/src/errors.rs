//! Root error types for the ingest crate.
//!
//! Per-record failures (`TransformError`, `SinkError`) are recovered inside
//! the pipeline driver and never propagate out of `run`; only
//! configuration and startup failures surface through this type.

use thiserror::Error;

use crate::sinks::SinkError;
use crate::transform::TransformError;
use blockdata_pricing::SymbolMapError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ingest pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The symbol map (or other startup configuration) could not be loaded.
    /// Fatal: aborts the run before any record is processed.
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] SymbolMapError),

    /// A sink failed during startup (e.g. the archive header could not be
    /// written). Fatal: no record output could be preserved.
    #[error("Sink failed during startup: {0}")]
    Sink(#[from] SinkError),

    /// A record transformation failed. Only surfaced when the transformer
    /// is used standalone; the pipeline driver recovers these per record.
    #[error("Record transform failed: {0}")]
    Transform(#[from] TransformError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdata_pricing::SymbolTable;

    #[test]
    fn test_unreadable_symbol_map_is_a_fatal_config_error() {
        let error: Error = SymbolTable::from_json_slice(b"not json").unwrap_err().into();
        assert!(matches!(error, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_sink_error_conversion() {
        let error: Error = SinkError::Archive {
            message: "disk full".to_string(),
        }
        .into();
        assert!(matches!(error, Error::Sink(_)));
    }
}
