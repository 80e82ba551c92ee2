//! CSV codec for the persisted dataset.
//!
//! The wire format is a UTF-8 CSV file with a header row: the typed columns
//! first, then the sorted union of passthrough columns found in the rows.
//! Absent markers inherited from older exports ("nan", "null", empty cells)
//! are normalized here, at the boundary, so the rest of the crate only ever
//! sees `None`.

use std::collections::BTreeSet;

use csv::{ReaderBuilder, StringRecord, Writer};

use super::{CatalogError, CatalogItem, PriceFlag};

/// Typed columns, in persisted order.
const COLUMNS: [&str; 13] = [
    "identifier",
    "kind",
    "title",
    "authors",
    "publisher",
    "year",
    "pages",
    "collection",
    "number",
    "cover_url",
    "source",
    "price_verified",
    "average_price",
];

/// Normalize a raw cell value to the single absent representation.
///
/// Empty strings and the textual NaN/null markers that leak out of
/// spreadsheet exports all decode to `None`.
pub fn normalize_absent(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("null")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build a catalog item from one CSV record, routing unknown columns into
/// `extra`. Shared with the spreadsheet importer.
pub(crate) fn item_from_record(headers: &StringRecord, record: &StringRecord) -> CatalogItem {
    let mut item = CatalogItem::default();
    for (header, raw) in headers.iter().zip(record.iter()) {
        let value = normalize_absent(raw);
        match header {
            "identifier" => item.identifier = value.unwrap_or_default(),
            "kind" => item.kind = value,
            "title" => item.title = value,
            "authors" => item.authors = value,
            "publisher" => item.publisher = value,
            "year" => item.year = value,
            "pages" => item.pages = value,
            "collection" => item.collection = value,
            "number" => item.number = value,
            "cover_url" => item.cover_url = value,
            "source" => item.source = value,
            "price_verified" => {
                item.price_verified = value.as_deref().map(PriceFlag::from).unwrap_or_default()
            }
            // Malformed price text is skipped, not fatal.
            "average_price" => item.average_price = value.and_then(|v| v.parse::<f64>().ok()),
            other => {
                if let Some(value) = value {
                    item.extra.insert(other.to_string(), value);
                }
            }
        }
    }
    // Hand-edited files can carry negative or over-precise prices.
    item.normalize_price();
    item
}

/// Decode a persisted CSV document into catalog items.
pub fn decode_csv(bytes: &[u8]) -> Result<Vec<CatalogItem>, CatalogError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        items.push(item_from_record(&headers, &record));
    }
    Ok(items)
}

/// Encode catalog items as a CSV document.
///
/// The header carries every typed column plus the union of `extra` keys
/// across all rows, so no column present in the input is ever dropped.
pub fn encode_csv(items: &[CatalogItem]) -> Result<Vec<u8>, CatalogError> {
    let extra_columns: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.extra.keys().map(String::as_str))
        .collect();

    let mut writer = Writer::from_writer(Vec::new());

    let header: Vec<&str> = COLUMNS.iter().copied().chain(extra_columns.clone()).collect();
    writer.write_record(&header)?;

    for item in items {
        let mut row: Vec<String> = vec![
            item.identifier.clone(),
            item.kind.clone().unwrap_or_default(),
            item.title.clone().unwrap_or_default(),
            item.authors.clone().unwrap_or_default(),
            item.publisher.clone().unwrap_or_default(),
            item.year.clone().unwrap_or_default(),
            item.pages.clone().unwrap_or_default(),
            item.collection.clone().unwrap_or_default(),
            item.number.clone().unwrap_or_default(),
            item.cover_url.clone().unwrap_or_default(),
            item.source.clone().unwrap_or_default(),
            item.price_verified.as_str().to_string(),
            item.average_price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default(),
        ];
        for column in &extra_columns {
            row.push(item.extra.get(*column).cloned().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| CatalogError::Encoding(e.to_string()))
}
