//! Dataset merge and deduplication.
//!
//! Merging is keyed on the catalog's identity key with last-write-wins
//! conflict resolution: when the same key occurs more than once in the
//! concatenated input, the last occurrence's fields are kept at the
//! position where the key first appeared. Rows without a key cannot be
//! deduplicated and pass through untouched.

use std::collections::HashMap;

use super::{CatalogError, CatalogItem, IdentityKey};

/// Merge an incoming row set into the persisted dataset.
///
/// The result preserves insertion order, contains at most one row per
/// identity key (the most recently written one), and is idempotent:
/// merging the same incoming set twice yields the same dataset.
pub fn merge(
    persisted: Vec<CatalogItem>,
    incoming: Vec<CatalogItem>,
    scheme: IdentityKey,
) -> Vec<CatalogItem> {
    let mut merged: Vec<CatalogItem> = Vec::with_capacity(persisted.len() + incoming.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in persisted.into_iter().chain(incoming) {
        match item.key(scheme) {
            Some(key) => {
                if let Some(&index) = positions.get(&key) {
                    merged[index] = item;
                } else {
                    positions.insert(key, merged.len());
                    merged.push(item);
                }
            }
            // No key fields - can't deduplicate, keep as-is.
            None => merged.push(item),
        }
    }

    merged
}

/// Append a single new item, rejecting duplicates.
///
/// An item conflicts when a persisted row has the same identity key and the
/// same `kind`; the same key under a different kind is a distinct item and
/// is appended. On conflict the persisted dataset is left untouched and the
/// caller gets the key back in the error.
pub fn add_item(
    persisted: &[CatalogItem],
    item: CatalogItem,
    scheme: IdentityKey,
) -> Result<Vec<CatalogItem>, CatalogError> {
    if let Some(key) = item.key(scheme) {
        let conflict = persisted
            .iter()
            .any(|existing| existing.key(scheme).as_deref() == Some(&key) && existing.kind == item.kind);
        if conflict {
            return Err(CatalogError::Duplicate { key });
        }
    }
    let mut appended = persisted.to_vec();
    appended.push(item);
    Ok(dedup_exact(appended))
}

/// Remove exact-duplicate rows (all fields equal), keeping the first
/// occurrence. Repeated enrichment runs over the same dataset would
/// otherwise accumulate identical rows.
pub fn dedup_exact(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut unique: Vec<CatalogItem> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
