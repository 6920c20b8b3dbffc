//! CSV ingestion of inventory transactions.

use crate::error::MemoryError;
use crate::Result;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use stockwise_core::InventoryRow;

/// Rows read from a source CSV, with the fingerprint of its bytes.
#[derive(Debug, Clone)]
pub struct SourceData {
    /// Parsed and validated rows, in file order.
    pub rows: Vec<InventoryRow>,

    /// Hex SHA-256 of the file contents.
    pub fingerprint: String,
}

/// Read and validate every row of the CSV at `path`.
///
/// The first malformed row aborts the read, and a file without data rows
/// is rejected.
pub fn load_csv(path: &Path) -> Result<SourceData> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MemoryError::SourceMissing(path.to_path_buf()),
        _ => MemoryError::Io(e),
    })?;

    let rows = read_rows(bytes.as_slice())?;
    if rows.is_empty() {
        return Err(MemoryError::EmptySource(path.to_path_buf()));
    }

    Ok(SourceData {
        fingerprint: fingerprint_bytes(&bytes),
        rows,
    })
}

/// Parse inventory rows from CSV data with a header line.
///
/// Columns are matched by header name; unknown columns are ignored and the
/// optional `closing_stock` and `notes` columns may be missing.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<InventoryRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(invalid_row)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: InventoryRow =
            record
                .deserialize(Some(&headers))
                .map_err(|e| MemoryError::InvalidRow {
                    line,
                    message: e.to_string(),
                })?;
        row.validate().map_err(|e| MemoryError::InvalidRow {
            line,
            message: e.to_string(),
        })?;

        rows.push(row);
    }

    Ok(rows)
}

fn invalid_row(err: csv::Error) -> MemoryError {
    match err.position().map(|p| p.line()) {
        Some(line) => MemoryError::InvalidRow {
            line,
            message: err.to_string(),
        },
        None => MemoryError::Csv(err),
    }
}

/// SHA-256 of the file at `path`, hex encoded.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    Ok(fingerprint_bytes(&std::fs::read(path)?))
}

fn fingerprint_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_minimal_columns() {
        let data = "sku,warehouse,txn_date,txn_type,quantity\nABC123,WH1,2024-01-01,SALE,5\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "ABC123");
        assert_eq!(rows[0].quantity, 5.0);
        assert_eq!(rows[0].closing_stock, None);
        assert_eq!(rows[0].notes, None);
    }

    #[test]
    fn test_read_optional_and_extra_columns() {
        let data = "\
sku, warehouse, txn_date, txn_type, quantity, closing_stock, notes, region
ABC123, WH1, 2024-01-01, SALE, 5, 95, promo week, EU
XYZ9, WH2, 2024-01-02, RECEIPT, 40, , , US
";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].closing_stock, Some(95.0));
        assert_eq!(rows[0].notes.as_deref(), Some("promo week"));
        assert_eq!(rows[1].closing_stock, None);
        assert_eq!(rows[1].notes(), None);
    }

    #[test]
    fn test_blank_required_field_reports_line() {
        let data = "sku,warehouse,txn_date,txn_type,quantity\nA,WH1,2024-01-01,SALE,1\n,WH1,2024-01-02,SALE,2\n";
        let err = read_rows(data.as_bytes()).unwrap_err();

        match err {
            MemoryError::InvalidRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("sku"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_quantity_fails() {
        let data = "sku,warehouse,txn_date,txn_type,quantity\nA,WH1,2024-01-01,SALE,lots\n";
        assert!(matches!(
            read_rows(data.as_bytes()),
            Err(MemoryError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_required_column_fails() {
        let data = "sku,warehouse,txn_date,quantity\nA,WH1,2024-01-01,1\n";
        assert!(read_rows(data.as_bytes()).is_err());
    }

    #[test]
    fn test_load_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, MemoryError::SourceMissing(_)));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        std::fs::write(&path, "sku,warehouse,txn_date,txn_type,quantity\nA,B,C,D,1\n").unwrap();

        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.rows.len(), 1);
        assert_eq!(loaded.fingerprint.len(), 64);
        assert_eq!(loaded.fingerprint, fingerprint_file(&path).unwrap());

        std::fs::write(&path, "sku,warehouse,txn_date,txn_type,quantity\nA,B,C,D,2\n").unwrap();
        assert_ne!(loaded.fingerprint, fingerprint_file(&path).unwrap());
    }

    #[test]
    fn test_load_csv_without_rows_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");

        for content in ["sku,warehouse,txn_date,txn_type,quantity\n", ""] {
            std::fs::write(&path, content).unwrap();
            let err = load_csv(&path).unwrap_err();
            assert!(matches!(err, MemoryError::EmptySource(_)));
        }
    }
}
