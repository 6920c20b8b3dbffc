//! Domain types shared across Stockwise crates.

mod document;
mod inventory;

pub use document::{DocumentMetadata, IndexedDocument, METADATA_KEYS};
pub use inventory::InventoryRow;
