//! Raw inventory transaction records.

use crate::error::RowError;
use serde::{Deserialize, Serialize};

/// One inventory transaction as it appears in the source CSV.
///
/// Columns beyond these are ignored; `closing_stock` and `notes` may be
/// absent from the header entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    /// Stock keeping unit.
    pub sku: String,

    /// Warehouse code.
    pub warehouse: String,

    /// Transaction date, kept verbatim.
    pub txn_date: String,

    /// Transaction type (SALE, RECEIPT, ADJUSTMENT, ...).
    pub txn_type: String,

    /// Quantity moved.
    pub quantity: f64,

    /// Stock on hand after the transaction.
    #[serde(default)]
    pub closing_stock: Option<f64>,

    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl InventoryRow {
    /// Create a row with only the required fields.
    pub fn new(
        sku: impl Into<String>,
        warehouse: impl Into<String>,
        txn_date: impl Into<String>,
        txn_type: impl Into<String>,
        quantity: f64,
    ) -> Self {
        Self {
            sku: sku.into(),
            warehouse: warehouse.into(),
            txn_date: txn_date.into(),
            txn_type: txn_type.into(),
            quantity,
            closing_stock: None,
            notes: None,
        }
    }

    /// Set the closing stock.
    pub fn with_closing_stock(mut self, closing_stock: f64) -> Self {
        self.closing_stock = Some(closing_stock);
        self
    }

    /// Set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check that every required field carries a value.
    pub fn validate(&self) -> Result<(), RowError> {
        let required = [
            ("sku", &self.sku),
            ("warehouse", &self.warehouse),
            ("txn_date", &self.txn_date),
            ("txn_type", &self.txn_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RowError::MissingField(field));
            }
        }

        if !self.quantity.is_finite() {
            return Err(RowError::NotFinite { field: "quantity" });
        }
        if matches!(self.closing_stock, Some(v) if !v.is_finite()) {
            return Err(RowError::NotFinite {
                field: "closing_stock",
            });
        }

        Ok(())
    }

    /// Notes, treating blank text as absent.
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}
