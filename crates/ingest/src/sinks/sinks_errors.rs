//! Sink error types.

use thiserror::Error;

/// Errors from the output sinks.
///
/// Non-fatal during a run: the driver logs the failure and continues with
/// the other sink and the next record. Only a failure before the first
/// record (writing the archive header) aborts the run.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The archive sink failed to write.
    #[error("Archive write failed: {message}")]
    Archive {
        /// Description of the failure from the underlying writer
        message: String,
    },

    /// The bus sink failed to publish.
    #[error("Bus publish failed: {message}")]
    Bus {
        /// Description of the failure from the underlying client
        message: String,
    },
}
