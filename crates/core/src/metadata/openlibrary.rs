//! Open Library books API provider.
//!
//! `GET {base}/api/books?bibkeys=ISBN:{code}&format=json&jscmd=data`
//! returns a JSON object keyed by the bibkey; an unknown ISBN yields an
//! empty object rather than a 404.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MetadataError, MetadataProvider, ProviderResponse};

/// Cover images live on a separate host, addressed by ISBN.
const COVERS_URL: &str = "https://covers.openlibrary.org/b/isbn";

/// Open Library provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenLibraryConfig {
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Base URL override (default: https://openlibrary.org).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_timeout() -> u64 {
    10
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            base_url: None,
        }
    }
}

/// Open Library metadata provider.
pub struct OpenLibraryProvider {
    client: Client,
    base_url: String,
}

impl OpenLibraryProvider {
    pub fn new(config: OpenLibraryConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://openlibrary.org".to_string());
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MetadataProvider for OpenLibraryProvider {
    fn name(&self) -> &str {
        "Open Library"
    }

    async fn try_resolve(&self, code: &str) -> Result<Option<ProviderResponse>, MetadataError> {
        let url = format!("{}/api/books", self.base_url);
        let bibkey = format!("ISBN:{}", code);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("bibkeys", bibkey.as_str()),
                ("format", "json"),
                ("jscmd", "data"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(code, status = %response.status(), "Open Library lookup not successful");
            return Ok(None);
        }

        let mut payload: HashMap<String, OlBook> = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        let Some(book) = payload.remove(&bibkey) else {
            return Ok(None);
        };

        Ok(Some(ProviderResponse {
            source_name: Some(self.name().to_string()),
            title: book.title,
            authors: join_names(book.authors),
            publisher: join_names(book.publishers),
            year: book.publish_date,
            pages: book.number_of_pages.map(|p| p.to_string()),
            cover_url: Some(format!("{}/{}-L.jpg", COVERS_URL, code)),
        }))
    }
}

fn join_names(names: Vec<OlName>) -> Option<String> {
    if names.is_empty() {
        None
    } else {
        Some(
            names
                .into_iter()
                .map(|n| n.name)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[derive(Debug, Deserialize)]
struct OlBook {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<OlName>,
    #[serde(default)]
    publishers: Vec<OlName>,
    #[serde(default)]
    publish_date: Option<String>,
    #[serde(default)]
    number_of_pages: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OlName {
    name: String,
}
