//! Blockdata Ingest - transaction enrichment pipeline core.
//!
//! This crate turns raw transaction rows into enriched records valued in
//! USD and hands them to two independent output sinks (a durable archive
//! and a message bus). One bad record never aborts a batch: every failure
//! is classified, logged with its ordinal position, and skipped.
//!
//! The pricing side (symbol resolution, rate cache, rate limiting, the
//! external pricing service) lives in the `blockdata-pricing` crate; this
//! crate owns record parsing, transformation, the sink boundaries, and the
//! pipeline driver.

pub mod errors;
pub mod pipeline;
pub mod sinks;
pub mod transform;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
