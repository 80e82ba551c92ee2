//! Typed catalog row and identity key schemes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the catalog dataset.
///
/// Every descriptive field is optional because the source data is
/// inconsistent; absence is always represented as `None`, never as a
/// sentinel string (see [`super::normalize_absent`]). Columns the typed
/// schema does not know about survive round-trips through `extra`, so a
/// merged dataset always carries the union of both inputs' columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Primary identifying code (ISBN for books; may be empty for
    /// card-style rows keyed by collection + number).
    #[serde(default)]
    pub identifier: String,
    /// Genre or item type (categorical, free-form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Comma-joined author list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Publication year, free-form (source data mixes "1994" and
    /// "March 1994").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    /// Collection / set code for card-style catalogs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Item number within the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Name of the metadata provider this row was resolved from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Whether a human has confirmed `average_price` as authoritative.
    #[serde(default)]
    pub price_verified: PriceFlag,
    /// Scraped average market price, rounded to 2 fraction digits.
    /// `None` means unknown, which is distinct from a price of zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_price: Option<f64>,
    /// Passthrough columns not covered by the typed schema.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CatalogItem {
    /// Identity key under the given scheme, or `None` when the key fields
    /// are absent (such rows are exempt from keyed deduplication).
    pub fn key(&self, scheme: IdentityKey) -> Option<String> {
        match scheme {
            IdentityKey::Identifier => {
                let id = self.identifier.trim();
                if id.is_empty() {
                    None
                } else {
                    Some(id.to_string())
                }
            }
            IdentityKey::CollectionNumber => {
                let collection = self.collection.as_deref()?.trim();
                let number = self.number.as_deref()?.trim();
                if collection.is_empty() || number.is_empty() {
                    None
                } else {
                    Some(format!("{}:{}", collection.to_lowercase(), number))
                }
            }
        }
    }

    /// True when the row's price was flagged by a human as correct.
    /// Such rows are never touched by the enrichment pass.
    pub fn is_price_verified(&self) -> bool {
        self.price_verified == PriceFlag::Yes
    }

    /// Force `average_price` onto its invariant: finite, non-negative and
    /// rounded to 2 fraction digits. Anything else becomes absent. Applied
    /// at every boundary where a price can enter from outside (CSV decode,
    /// API item bodies).
    pub fn normalize_price(&mut self) {
        self.average_price = self
            .average_price
            .and_then(|p| (p.is_finite() && p >= 0.0).then(|| (p * 100.0).round() / 100.0));
    }
}

/// Human verification flag for the average price.
///
/// Parsed from the literal string `yes`; any other value means "not
/// verified".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFlag {
    Yes,
    #[default]
    #[serde(other)]
    No,
}

impl PriceFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceFlag::Yes => "yes",
            PriceFlag::No => "no",
        }
    }
}

impl From<&str> for PriceFlag {
    fn from(value: &str) -> Self {
        if value.trim() == "yes" {
            PriceFlag::Yes
        } else {
            PriceFlag::No
        }
    }
}

/// Which field (or field pair) uniquely identifies a row.
///
/// Book catalogs are keyed by ISBN, card catalogs by the
/// collection-code + item-number composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKey {
    #[default]
    Identifier,
    CollectionNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_key_trims() {
        let item = CatalogItem {
            identifier: " 9780000000001 ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            item.key(IdentityKey::Identifier),
            Some("9780000000001".to_string())
        );
    }

    #[test]
    fn test_empty_identifier_has_no_key() {
        let item = CatalogItem::default();
        assert_eq!(item.key(IdentityKey::Identifier), None);
    }

    #[test]
    fn test_collection_number_key_lowercases_collection() {
        let item = CatalogItem {
            collection: Some("NEO".to_string()),
            number: Some("042".to_string()),
            ..Default::default()
        };
        assert_eq!(
            item.key(IdentityKey::CollectionNumber),
            Some("neo:042".to_string())
        );
    }

    #[test]
    fn test_collection_number_key_requires_both_fields() {
        let item = CatalogItem {
            collection: Some("neo".to_string()),
            ..Default::default()
        };
        assert_eq!(item.key(IdentityKey::CollectionNumber), None);
    }

    #[test]
    fn test_normalize_price_clamps_to_invariant() {
        let mut item = CatalogItem {
            average_price: Some(10.129),
            ..Default::default()
        };
        item.normalize_price();
        assert_eq!(item.average_price, Some(10.13));

        item.average_price = Some(-1.0);
        item.normalize_price();
        assert_eq!(item.average_price, None);

        item.average_price = Some(f64::NAN);
        item.normalize_price();
        assert_eq!(item.average_price, None);
    }

    #[test]
    fn test_price_flag_from_str() {
        assert_eq!(PriceFlag::from("yes"), PriceFlag::Yes);
        assert_eq!(PriceFlag::from("Yes"), PriceFlag::No);
        assert_eq!(PriceFlag::from(""), PriceFlag::No);
        assert_eq!(PriceFlag::from("maybe"), PriceFlag::No);
    }
}
