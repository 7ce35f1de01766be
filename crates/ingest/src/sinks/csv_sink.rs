//! CSV archive sink.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::warn;

use super::sinks_errors::SinkError;
use super::sinks_traits::ArchiveSink;
use crate::transform::TransformedRecord;

/// Header row of the archive, fixed by contract with downstream consumers.
pub const ARCHIVE_HEADER: [&str; 6] = ["key", "date", "project_id", "volume", "currency", "volume_usd"];

/// Archive sink writing CSV rows to any `io::Write` destination.
///
/// Amounts are formatted to two decimal places. Each write is flushed so
/// that already-processed output survives a later abort.
pub struct CsvArchiveSink<W: Write + Send> {
    writer: Mutex<csv::Writer<W>>,
}

impl<W: Write + Send> CsvArchiveSink<W> {
    /// Create a sink over a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(csv::Writer::from_writer(writer)),
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, csv::Writer<W>> {
        self.writer.lock().unwrap_or_else(|poisoned| {
            warn!("Archive writer mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_row<I, T>(&self, row: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut writer = self.lock_writer();
        writer
            .write_record(row)
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| SinkError::Archive {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl<W: Write + Send> ArchiveSink for CsvArchiveSink<W> {
    async fn write_header(&self) -> Result<(), SinkError> {
        self.write_row(ARCHIVE_HEADER)
    }

    async fn write_record(&self, record: &TransformedRecord) -> Result<(), SinkError> {
        self.write_row([
            record.key.clone(),
            record.date.clone(),
            record.project_id.clone(),
            format!("{:.2}", record.volume.round_dp(2)),
            record.currency.clone(),
            format!("{:.2}", record.volume_usd.round_dp(2)),
        ])
    }
}
