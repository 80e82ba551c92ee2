//! BrasilAPI ISBN provider.
//!
//! `GET {base}/api/isbn/v1/{code}` returns a flat JSON record; unknown
//! codes answer 404.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MetadataError, MetadataProvider, ProviderResponse};

/// BrasilAPI provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrasilApiConfig {
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Base URL override (default: https://brasilapi.com.br).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_timeout() -> u64 {
    10
}

impl Default for BrasilApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            base_url: None,
        }
    }
}

/// BrasilAPI metadata provider.
pub struct BrasilApiProvider {
    client: Client,
    base_url: String,
}

impl BrasilApiProvider {
    pub fn new(config: BrasilApiConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://brasilapi.com.br".to_string());
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MetadataProvider for BrasilApiProvider {
    fn name(&self) -> &str {
        "BrasilAPI"
    }

    async fn try_resolve(&self, code: &str) -> Result<Option<ProviderResponse>, MetadataError> {
        let url = format!(
            "{}/api/isbn/v1/{}",
            self.base_url,
            urlencoding::encode(code)
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            debug!(code, status = %response.status(), "BrasilAPI lookup not successful");
            return Ok(None);
        }

        let book: BrBook = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        Ok(Some(ProviderResponse {
            source_name: Some(self.name().to_string()),
            title: book.title,
            authors: if book.authors.is_empty() {
                None
            } else {
                Some(book.authors.join(", "))
            },
            publisher: book.publisher,
            year: book.year.map(|y| y.to_string()),
            pages: book.page_count.map(|p| p.to_string()),
            cover_url: None,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct BrBook {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default, alias = "pages")]
    page_count: Option<u32>,
}
