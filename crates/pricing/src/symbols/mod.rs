//! Symbol resolution: free-text currency symbols to canonical pricing ids.
//!
//! The pricing service identifies currencies by a stable canonical id
//! ("ethereum", "matic-network"), while raw records carry free-text symbols
//! ("ETH", "Matic"). The [`SymbolTable`] maps one to the other. It is loaded
//! once before a run from a JSON object and never mutated afterwards.

use std::collections::HashMap;
use std::io::Read;

use crate::errors::SymbolMapError;

/// Immutable, case-insensitive symbol to canonical-id lookup table.
#[derive(Debug)]
pub struct SymbolTable {
    map: HashMap<String, String>,
}

impl SymbolTable {
    /// Create a table from an already-built map.
    ///
    /// Keys are normalized to lower case, so a mixed-case source cannot
    /// produce unreachable entries.
    pub fn new(map: HashMap<String, String>) -> Self {
        let map = map
            .into_iter()
            .map(|(symbol, id)| (symbol.to_lowercase(), id))
            .collect();
        Self { map }
    }

    /// Load the table from a JSON object of symbol to canonical id.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, SymbolMapError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        Self::from_json_slice(&raw)
    }

    /// Load the table from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SymbolMapError> {
        let map: HashMap<String, String> = serde_json::from_slice(bytes)?;
        Ok(Self::new(map))
    }

    /// Resolve a free-text symbol to its canonical pricing id.
    ///
    /// Lookup is case-insensitive. `None` means the symbol is absent from
    /// the map, a per-record, non-fatal condition.
    pub fn resolve(&self, raw_symbol: &str) -> Option<&str> {
        self.map.get(&raw_symbol.to_lowercase()).map(String::as_str)
    }

    /// Number of mapped symbols.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no symbols are mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::from_json_slice(br#"{"eth": "ethereum", "matic": "matic-network"}"#).unwrap()
    }

    #[test]
    fn test_resolve_known_symbol() {
        let table = table();
        assert_eq!(table.resolve("eth"), Some("ethereum"));
        assert_eq!(table.resolve("matic"), Some("matic-network"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let table = table();
        assert_eq!(table.resolve("ETH"), Some("ethereum"));
        assert_eq!(table.resolve("Matic"), Some("matic-network"));
    }

    #[test]
    fn test_resolve_unknown_symbol() {
        let table = table();
        assert_eq!(table.resolve("doge"), None);
    }

    #[test]
    fn test_mixed_case_map_keys_are_normalized() {
        let table = SymbolTable::from_json_slice(br#"{"WETH": "weth"}"#).unwrap();
        assert_eq!(table.resolve("weth"), Some("weth"));
        assert_eq!(table.resolve("WETH"), Some("weth"));
    }

    #[test]
    fn test_from_reader() {
        let json = br#"{"eth": "ethereum"}"#;
        let table = SymbolTable::from_reader(&json[..]).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let result = SymbolTable::from_json_slice(b"not json");
        assert!(matches!(result, Err(SymbolMapError::Json(_))));
    }

    #[test]
    fn test_non_object_json_is_a_config_error() {
        let result = SymbolTable::from_json_slice(b"[1, 2, 3]");
        assert!(matches!(result, Err(SymbolMapError::Json(_))));
    }
}
