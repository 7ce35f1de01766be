//! Pipeline driver service.

use std::io::Read;
use std::sync::Arc;

use log::{error, info, warn};

use blockdata_pricing::RateResolver;

use super::pipeline_model::RunSummary;
use crate::errors::Result;
use crate::sinks::{ArchiveSink, BusSink};
use crate::transform::{RecordTransformer, TransformedRecord};

/// Drives raw records through the transformer and out to both sinks.
///
/// Per-record failures are classified, logged with the record's ordinal
/// position, and skipped; they never abort the batch. Sink failures are
/// recovered independently per sink per record. Only startup failures
/// (the archive header write) propagate out of [`run`](Self::run).
pub struct PipelineService {
    transformer: RecordTransformer,
    archive: Arc<dyn ArchiveSink>,
    bus: Arc<dyn BusSink>,
    resolver: Arc<RateResolver>,
}

impl PipelineService {
    /// Create a driver over a transformer, the two sinks, and the run's
    /// rate resolver (held for the end-of-run cache audit).
    pub fn new(
        transformer: RecordTransformer,
        archive: Arc<dyn ArchiveSink>,
        bus: Arc<dyn BusSink>,
        resolver: Arc<RateResolver>,
    ) -> Self {
        Self {
            transformer,
            archive,
            bus,
            resolver,
        }
    }

    /// Process every raw record and return the run summary.
    pub async fn run<I>(&self, records: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = csv::StringRecord>,
    {
        self.archive.write_header().await?;

        let mut summary = RunSummary::default();

        for (ordinal, record) in records.into_iter().enumerate() {
            summary.total += 1;

            match self.transformer.transform(&record).await {
                Ok(transformed) => {
                    summary.transformed += 1;
                    self.emit(ordinal, &transformed).await;
                }
                Err(err) => {
                    summary.failed.record(err.kind());
                    warn!("Error transforming record {}: {}", ordinal, err);

                    if err.is_operational() {
                        error!(
                            "Rate limiter wedged, skipping the remainder of the batch: {}",
                            err
                        );
                        break;
                    }
                }
            }
        }

        self.finish(&mut summary);
        Ok(summary)
    }

    /// Read records from a CSV source (skipping its header row) and run
    /// the pipeline over them. Rows that fail to read are counted as
    /// decode failures.
    pub async fn run_csv<R: Read>(&self, reader: R) -> Result<RunSummary> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut unreadable = 0usize;
        for (ordinal, row) in csv_reader.records().enumerate() {
            match row {
                Ok(record) => rows.push(record),
                Err(err) => {
                    unreadable += 1;
                    warn!("Error reading record {}: {}", ordinal, err);
                }
            }
        }

        let mut summary = self.run(rows).await?;
        summary.total += unreadable;
        summary.failed.decode += unreadable;
        Ok(summary)
    }

    /// Hand one transformed record to both sinks, independently.
    ///
    /// The writes are issued concurrently; a failure in one is logged and
    /// does not prevent the other, and the record is never reprocessed.
    async fn emit(&self, ordinal: usize, record: &TransformedRecord) {
        let (archive_result, bus_result) = tokio::join!(
            self.archive.write_record(record),
            self.bus.publish(record)
        );

        if let Err(err) = archive_result {
            warn!("Error archiving record {}: {}", ordinal, err);
        }
        if let Err(err) = bus_result {
            warn!("Error publishing record {}: {}", ordinal, err);
        }
    }

    fn finish(&self, summary: &mut RunSummary) {
        summary.rate_cache = self.resolver.cache_snapshot();

        match serde_json::to_string(&summary.rate_cache) {
            Ok(json) => info!("USD rate cache content: {}", json),
            Err(err) => warn!("Error serializing rate cache: {}", err),
        }

        info!(
            "Pipeline run complete: {} records seen, {} transformed, {} failed",
            summary.total,
            summary.transformed,
            summary.failed.total()
        );
    }
}
