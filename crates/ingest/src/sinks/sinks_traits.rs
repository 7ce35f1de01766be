//! Sink trait definitions.

use async_trait::async_trait;

use super::sinks_errors::SinkError;
use crate::transform::TransformedRecord;

/// Trait for the durable archive sink.
///
/// The archive receives a header row once, then one row per transformed
/// record. Implementations must tolerate being called from concurrent
/// record emissions; rows need no ordering relative to each other.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Write the header row. Called exactly once, before any record.
    async fn write_header(&self) -> Result<(), SinkError>;

    /// Append one transformed record.
    async fn write_record(&self, record: &TransformedRecord) -> Result<(), SinkError>;
}

/// Trait for the message-bus sink.
///
/// Delivery is at-least-once best-effort per record: a failed publish is
/// logged and not retried by the pipeline.
#[async_trait]
pub trait BusSink: Send + Sync {
    /// Publish one transformed record.
    async fn publish(&self, record: &TransformedRecord) -> Result<(), SinkError>;
}
