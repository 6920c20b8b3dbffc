//! Documents stored in the vector index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata keys carried by every indexed document, in wire order.
pub const METADATA_KEYS: [&str; 4] = ["sku", "warehouse", "txn_date", "txn_type"];

/// Identifying fields of an inventory transaction, always as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub sku: String,
    pub warehouse: String,
    pub txn_date: String,
    pub txn_type: String,
}

impl DocumentMetadata {
    /// Look up a metadata value by key name.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "sku" => Some(&self.sku),
            "warehouse" => Some(&self.warehouse),
            "txn_date" => Some(&self.txn_date),
            "txn_type" => Some(&self.txn_type),
            _ => None,
        }
    }

    /// Metadata as a key/value map.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        METADATA_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v.to_string())))
            .collect()
    }
}

/// A text body plus its metadata, derived from one inventory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Human-readable summary of the row.
    pub content: String,

    /// Identifying fields.
    pub metadata: DocumentMetadata,
}
