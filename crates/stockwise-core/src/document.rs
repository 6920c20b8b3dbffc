//! Rendering inventory rows into indexable documents.

use crate::types::{DocumentMetadata, IndexedDocument, InventoryRow};

/// Rendered in place of an optional field the row does not carry.
pub const MISSING_PLACEHOLDER: &str = "N/A";

/// Build the indexed document for one inventory row.
///
/// Every field is rendered on its own `label: value` line in a fixed order.
/// Optional fields that are absent render as [`MISSING_PLACEHOLDER`].
pub fn build_document(row: &InventoryRow) -> IndexedDocument {
    let closing_stock = row
        .closing_stock
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string());
    let notes = row.notes().unwrap_or(MISSING_PLACEHOLDER);

    let content = format!(
        "Inventory transaction:\n- SKU: {}\n- Warehouse: {}\n- Date: {}\n- Type: {}\n- Quantity: {}\n- Closing Stock: {}\n- Notes: {}",
        row.sku.trim(),
        row.warehouse.trim(),
        row.txn_date.trim(),
        row.txn_type.trim(),
        row.quantity,
        closing_stock,
        notes,
    );

    IndexedDocument {
        content,
        metadata: DocumentMetadata {
            sku: row.sku.trim().to_string(),
            warehouse: row.warehouse.trim().to_string(),
            txn_date: row.txn_date.trim().to_string(),
            txn_type: row.txn_type.trim().to_string(),
        },
    }
}

impl From<&InventoryRow> for IndexedDocument {
    fn from(row: &InventoryRow) -> Self {
        build_document(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::METADATA_KEYS;

    #[test]
    fn test_layout_with_all_fields() {
        let row = InventoryRow::new("ABC123", "WH1", "2024-01-01", "SALE", 5.0)
            .with_closing_stock(95.0)
            .with_notes("promo week");
        let doc = build_document(&row);

        assert_eq!(
            doc.content,
            "Inventory transaction:\n\
             - SKU: ABC123\n\
             - Warehouse: WH1\n\
             - Date: 2024-01-01\n\
             - Type: SALE\n\
             - Quantity: 5\n\
             - Closing Stock: 95\n\
             - Notes: promo week"
        );
    }

    #[test]
    fn test_missing_optional_fields_use_placeholder() {
        let row = InventoryRow::new("ABC123", "WH1", "2024-01-01", "SALE", 2.5);
        let doc = build_document(&row);

        assert!(doc.content.contains("- Quantity: 2.5"));
        assert!(doc.content.contains("- Closing Stock: N/A"));
        assert!(doc.content.ends_with("- Notes: N/A"));
    }

    #[test]
    fn test_metadata_has_exactly_identifying_keys() {
        let row = InventoryRow::new(" 000123 ", "7", "2024-01-01", "RECEIPT", 40.0);
        let doc = IndexedDocument::from(&row);
        let map = doc.metadata.to_map();

        assert_eq!(map.len(), METADATA_KEYS.len());
        assert_eq!(map["sku"], "000123");
        assert_eq!(map["warehouse"], "7");
        assert_eq!(map["txn_type"], "RECEIPT");
    }
}
