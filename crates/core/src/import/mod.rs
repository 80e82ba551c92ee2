//! Bulk import from a spreadsheet export.
//!
//! The input is a CSV export with at minimum an `identifier` column; every
//! other column passes through unchanged. Rows already present in the
//! persisted dataset are skipped; new rows are backfilled from the
//! metadata resolver (only fields the spreadsheet left absent are filled).

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::catalog::{item_from_record, CatalogItem, IdentityKey};
use crate::metadata::{MetadataResolver, ProviderResponse};

/// How often import progress is logged, in rows.
const PROGRESS_INTERVAL: usize = 20;

/// Errors from a bulk import.
///
/// Schema errors are fatal for the whole operation and surface before any
/// metadata lookup or write happens.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A required column is missing from the input file.
    #[error("import file must contain a '{0}' column")]
    MissingColumn(String),

    /// The input is not parseable CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Counts for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// New rows produced by the import.
    pub added: usize,
    /// Input rows skipped because their key already exists.
    pub skipped_existing: usize,
}

/// Parse a spreadsheet export and resolve metadata for its new rows.
///
/// Returns the new rows (to be merged into the persisted dataset by the
/// caller) and the outcome counts. Resolution failures degrade to absent
/// fields on the affected row; they never abort the batch.
pub async fn import_spreadsheet(
    bytes: &[u8],
    existing: &[CatalogItem],
    resolver: &MetadataResolver,
    scheme: IdentityKey,
) -> Result<(Vec<CatalogItem>, ImportOutcome), ImportError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "identifier") {
        return Err(ImportError::MissingColumn("identifier".to_string()));
    }

    // Parse everything up front so a malformed file aborts before any
    // lookup or partial result.
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(item_from_record(&headers, &record));
    }

    let mut known_keys: HashSet<String> = existing
        .iter()
        .filter_map(|item| item.key(scheme))
        .collect();

    let total = rows.len();
    let mut outcome = ImportOutcome::default();
    let mut imported = Vec::new();

    for (index, mut item) in rows.into_iter().enumerate() {
        let key = item.key(scheme);
        let is_known = key
            .as_ref()
            .map(|k| known_keys.contains(k))
            .unwrap_or(false);

        if is_known {
            outcome.skipped_existing += 1;
        } else {
            if let Some(key) = key {
                known_keys.insert(key);
            }
            let metadata = resolver.resolve(item.identifier.trim()).await;
            apply_metadata(&mut item, metadata);
            imported.push(item);
            outcome.added += 1;
        }

        let processed = index + 1;
        if processed % PROGRESS_INTERVAL == 0 || processed == total {
            info!(processed, total, "import progress");
        }
    }

    Ok((imported, outcome))
}

/// Fill absent fields from resolved metadata. Values already present in
/// the spreadsheet win.
fn apply_metadata(item: &mut CatalogItem, metadata: ProviderResponse) {
    if item.source.is_none() {
        item.source = metadata.source_name;
    }
    if item.title.is_none() {
        item.title = metadata.title;
    }
    if item.authors.is_none() {
        item.authors = metadata.authors;
    }
    if item.publisher.is_none() {
        item.publisher = metadata.publisher;
    }
    if item.year.is_none() {
        item.year = metadata.year;
    }
    if item.pages.is_none() {
        item.pages = metadata.pages;
    }
    if item.cover_url.is_none() {
        item.cover_url = metadata.cover_url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    fn resolver_with(title: &str) -> MetadataResolver {
        let provider = MockProvider::named("Mock").with_response(ProviderResponse {
            source_name: Some("Mock".to_string()),
            title: Some(title.to_string()),
            publisher: Some("Acme".to_string()),
            ..Default::default()
        });
        MetadataResolver::new(vec![Box::new(provider)])
    }

    #[tokio::test]
    async fn test_missing_identifier_column_is_fatal() {
        let csv = "isbn,title\n123,Foo\n";
        let result = import_spreadsheet(
            csv.as_bytes(),
            &[],
            &resolver_with("x"),
            IdentityKey::Identifier,
        )
        .await;
        assert!(matches!(result, Err(ImportError::MissingColumn(ref c)) if c == "identifier"));
    }

    #[tokio::test]
    async fn test_new_rows_are_resolved_and_passthrough_kept() {
        let csv = "identifier,shelf\n123,A1\n";
        let (items, outcome) = import_spreadsheet(
            csv.as_bytes(),
            &[],
            &resolver_with("Resolved Title"),
            IdentityKey::Identifier,
        )
        .await
        .unwrap();

        assert_eq!(outcome.added, 1);
        assert_eq!(items[0].title.as_deref(), Some("Resolved Title"));
        assert_eq!(items[0].source.as_deref(), Some("Mock"));
        assert_eq!(items[0].extra.get("shelf").map(String::as_str), Some("A1"));
    }

    #[tokio::test]
    async fn test_spreadsheet_values_win_over_metadata() {
        let csv = "identifier,title\n123,Spreadsheet Title\n";
        let (items, _) = import_spreadsheet(
            csv.as_bytes(),
            &[],
            &resolver_with("Resolved Title"),
            IdentityKey::Identifier,
        )
        .await
        .unwrap();

        assert_eq!(items[0].title.as_deref(), Some("Spreadsheet Title"));
        // Absent fields still get backfilled.
        assert_eq!(items[0].publisher.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_existing_rows_are_skipped() {
        let existing = vec![CatalogItem {
            identifier: "123".to_string(),
            ..Default::default()
        }];
        let csv = "identifier\n123\n456\n";
        let (items, outcome) = import_spreadsheet(
            csv.as_bytes(),
            &existing,
            &resolver_with("x"),
            IdentityKey::Identifier,
        )
        .await
        .unwrap();

        assert_eq!(outcome.skipped_existing, 1);
        assert_eq!(outcome.added, 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier, "456");
    }

    #[tokio::test]
    async fn test_duplicate_rows_within_batch_collapse() {
        let csv = "identifier\n123\n123\n";
        let (items, outcome) = import_spreadsheet(
            csv.as_bytes(),
            &[],
            &resolver_with("x"),
            IdentityKey::Identifier,
        )
        .await
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.skipped_existing, 1);
    }
}
