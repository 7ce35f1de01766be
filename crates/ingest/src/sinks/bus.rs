//! Bus sink implementations for wiring and tests.
//!
//! The real message-bus client lives outside this crate; these
//! implementations cover the cases where no bus is attached (no-op) or
//! where published payloads need to be observed (in-memory buffer).

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, warn};

use super::sinks_errors::SinkError;
use super::sinks_traits::BusSink;
use crate::transform::TransformedRecord;

/// Bus sink that discards every message.
#[derive(Clone, Default)]
pub struct NoOpBusSink;

#[async_trait]
impl BusSink for NoOpBusSink {
    async fn publish(&self, record: &TransformedRecord) -> Result<(), SinkError> {
        debug!("Discarding bus message for key {}", record.key);
        Ok(())
    }
}

/// Bus sink that buffers serialized payloads in memory.
///
/// Payloads are stored exactly as a real client would send them: the JSON
/// encoding of the record's fields.
#[derive(Clone, Default)]
pub struct MemoryBusSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryBusSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_messages(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|poisoned| {
            warn!("Bus sink buffer mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Returns all buffered payloads.
    pub fn messages(&self) -> Vec<String> {
        self.lock_messages().clone()
    }

    /// Returns the number of buffered payloads.
    pub fn len(&self) -> usize {
        self.lock_messages().len()
    }

    /// Returns true if nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.lock_messages().is_empty()
    }
}

#[async_trait]
impl BusSink for MemoryBusSink {
    async fn publish(&self, record: &TransformedRecord) -> Result<(), SinkError> {
        let payload = serde_json::to_string(record).map_err(|e| SinkError::Bus {
            message: e.to_string(),
        })?;
        self.lock_messages().push(payload);
        Ok(())
    }
}
