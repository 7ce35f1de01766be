//! Record transformation service.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use blockdata_pricing::{cache_key, RateResolver, SymbolTable};

use super::transform_constants::{
    DATE_FORMAT, FIELD_NUMS, FIELD_PROJECT_ID, FIELD_PROPS, FIELD_TIMESTAMP, TIMESTAMP_FORMAT,
};
use super::transform_errors::{Blob, TransformError};
use super::transform_model::{NumsBlob, PropsBlob, TransformedRecord};

/// Transforms one raw record into an enriched [`TransformedRecord`].
///
/// Holds the run's symbol table and rate resolver; both are shared,
/// read-mostly state constructed before the run starts. No partial record
/// is ever produced: any step's failure aborts only that record.
#[derive(Clone)]
pub struct RecordTransformer {
    symbols: Arc<SymbolTable>,
    resolver: Arc<RateResolver>,
}

impl RecordTransformer {
    /// Create a transformer over a symbol table and rate resolver.
    pub fn new(symbols: Arc<SymbolTable>, resolver: Arc<RateResolver>) -> Self {
        Self { symbols, resolver }
    }

    /// Transform one raw record.
    pub async fn transform(
        &self,
        record: &csv::StringRecord,
    ) -> Result<TransformedRecord, TransformError> {
        let raw_timestamp = field(record, FIELD_TIMESTAMP)?;
        let project_id = field(record, FIELD_PROJECT_ID)?;
        let raw_props = field(record, FIELD_PROPS)?;
        let raw_nums = field(record, FIELD_NUMS)?;

        let props: PropsBlob =
            serde_json::from_str(raw_props).map_err(|source| TransformError::Decode {
                blob: Blob::Props,
                source,
            })?;
        let nums: NumsBlob =
            serde_json::from_str(raw_nums).map_err(|source| TransformError::Decode {
                blob: Blob::Nums,
                source,
            })?;

        let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT).map_err(
            |source| TransformError::Timestamp {
                raw: raw_timestamp.to_string(),
                source,
            },
        )?;
        // Time-of-day is discarded from here on; keying and rate lookup
        // use date granularity.
        let date = timestamp.date();

        let volume = Decimal::from_str(&nums.currency_value_decimal).map_err(|source| {
            TransformError::Amount {
                raw: nums.currency_value_decimal.clone(),
                source,
            }
        })?;

        let symbol = props.currency_symbol.to_lowercase();
        let symbol_id =
            self.symbols
                .resolve(&symbol)
                .ok_or_else(|| TransformError::UnmappedSymbol {
                    symbol: symbol.clone(),
                })?;

        let rate = self.resolver.usd_rate(symbol_id, date).await.map_err(|source| {
            TransformError::RateResolution {
                cache_key: cache_key(symbol_id, date),
                source,
            }
        })?;

        let date = date.format(DATE_FORMAT).to_string();
        Ok(TransformedRecord {
            key: format!("{}_{}", date, project_id),
            project_id: project_id.to_string(),
            volume,
            currency: symbol_id.to_string(),
            volume_usd: rate * volume,
            txn_hash: props.txn_hash,
            date,
        })
    }
}

fn field<'a>(record: &'a csv::StringRecord, index: usize) -> Result<&'a str, TransformError> {
    record.get(index).ok_or(TransformError::MissingField { index })
}
