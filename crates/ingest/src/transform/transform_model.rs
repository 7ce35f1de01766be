//! Domain models for record transformation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Properties blob carried on each raw record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropsBlob {
    /// Free-text currency symbol (e.g. "ETH", "matic").
    pub currency_symbol: String,
    /// Transaction hash, when the upstream producer recorded one.
    #[serde(default)]
    pub txn_hash: Option<String>,
}

/// Numeric blob carried on each raw record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumsBlob {
    /// Currency amount as decimal text.
    pub currency_value_decimal: String,
}

/// Enriched output record handed to both sinks.
///
/// `volume_usd` is always derived (rate x volume), never independently
/// supplied. `key` is deterministic given `date` and `project_id`, so
/// reprocessing the same logical record yields the same key and downstream
/// consumers can upsert idempotently.
#[derive(Clone, Debug, Serialize)]
pub struct TransformedRecord {
    /// Natural dedup/partition key: `date_projectid`.
    pub key: String,
    /// Calendar date of the transaction (`YYYY-MM-DD`).
    pub date: String,
    /// Upstream project identifier, opaque text.
    pub project_id: String,
    /// Original currency amount.
    pub volume: Decimal,
    /// Canonical pricing identifier of the currency.
    pub currency: String,
    /// USD valuation: resolved rate x volume.
    pub volume_usd: Decimal,
    /// Transaction hash, carried through when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_props_blob_decodes_camel_case() {
        let props: PropsBlob =
            serde_json::from_str(r#"{"currencySymbol":"ETH","txnHash":"0xabc"}"#).unwrap();
        assert_eq!(props.currency_symbol, "ETH");
        assert_eq!(props.txn_hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_props_blob_txn_hash_is_optional() {
        let props: PropsBlob = serde_json::from_str(r#"{"currencySymbol":"ETH"}"#).unwrap();
        assert_eq!(props.txn_hash, None);
    }

    #[test]
    fn test_nums_blob_decodes() {
        let nums: NumsBlob = serde_json::from_str(r#"{"currencyValueDecimal":"2.5"}"#).unwrap();
        assert_eq!(nums.currency_value_decimal, "2.5");
    }

    #[test]
    fn test_record_serializes_without_absent_txn_hash() {
        let record = TransformedRecord {
            key: "2024-01-15_42".to_string(),
            date: "2024-01-15".to_string(),
            project_id: "42".to_string(),
            volume: dec!(2.5),
            currency: "ethereum".to_string(),
            volume_usd: dec!(6250.0),
            txn_hash: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("txn_hash").is_none());
        assert_eq!(json["key"], "2024-01-15_42");
        assert_eq!(json["volume"], 2.5);
        assert_eq!(json["volume_usd"], 6250.0);
    }
}
