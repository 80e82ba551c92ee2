//! Catalog data model and dataset operations.
//!
//! The catalog is a flat dataset of [`CatalogItem`] rows persisted as a CSV
//! file. This module owns the typed row record, the CSV codec (the only
//! place where "nan"-style absent markers are normalized), and the merge /
//! deduplication rules applied before every persist.

mod csv;
mod merge;
mod types;

pub use csv::{decode_csv, encode_csv, normalize_absent};
pub(crate) use csv::item_from_record;
pub use merge::{add_item, dedup_exact, merge};
pub use types::*;

use thiserror::Error;

/// Errors produced by catalog dataset operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An item with the same identity key (and kind) already exists.
    #[error("item already exists: {key}")]
    Duplicate { key: String },

    /// CSV parse or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// The dataset bytes were not valid for the tabular encoding.
    #[error("invalid dataset encoding: {0}")]
    Encoding(String),
}
