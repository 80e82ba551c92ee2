//! GitHub contents API store.
//!
//! The dataset is one CSV file in a repository. Reads fetch the
//! base64-framed blob plus its SHA; writes re-fetch the current SHA (the
//! version token the API requires for updates) and PUT the new content.
//! A stale SHA between two racing writers is resolved by the API, not
//! here - last write wins.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{decode_csv, encode_csv, CatalogItem};

use super::{CatalogStore, StoreError};

/// GitHub store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubStoreConfig {
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Path of the dataset file within the repository.
    pub path: String,
    /// Personal access token with contents write permission.
    pub token: String,
    /// Branch to read from and commit to (default: main).
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// API base URL override (default: https://api.github.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Catalog store backed by the GitHub contents API.
pub struct GithubStore {
    client: Client,
    config: GithubStoreConfig,
    api_base: String,
}

impl GithubStore {
    pub fn new(config: GithubStoreConfig) -> Result<Self, StoreError> {
        // GitHub rejects requests without a User-Agent.
        let client = Client::builder()
            .user_agent(format!("acervo/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| "https://api.github.com".to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            config,
            api_base,
        })
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base, self.config.repo, self.config.path
        )
    }

    /// Fetch the current blob, or `None` when the file does not exist yet.
    async fn fetch_blob(&self) -> Result<Option<ContentsBlob>, StoreError> {
        let response = self
            .client
            .get(self.contents_url())
            .header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let blob: ContentsBlob = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(blob))
            }
            status => Err(StoreError::Api {
                status: status.as_u16(),
                message: api_message(response).await,
            }),
        }
    }
}

#[async_trait]
impl CatalogStore for GithubStore {
    async fn load(&self) -> Result<Vec<CatalogItem>, StoreError> {
        let Some(blob) = self.fetch_blob().await? else {
            debug!(path = %self.config.path, "dataset file not found, loading empty dataset");
            return Ok(Vec::new());
        };

        // The API wraps base64 content in newlines.
        let packed: String = blob.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(packed)
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let items = decode_csv(&bytes)?;
        debug!(rows = items.len(), path = %self.config.path, "dataset loaded");
        Ok(items)
    }

    async fn save(&self, items: &[CatalogItem], message: &str) -> Result<(), StoreError> {
        // Current SHA is the optimistic-concurrency token; absent for a
        // new file.
        let sha = self.fetch_blob().await?.map(|blob| blob.sha);
        let csv = encode_csv(items)?;

        let body = PutContents {
            message,
            content: BASE64.encode(&csv),
            branch: &self.config.branch,
            sha,
        };

        let response = self
            .client
            .put(self.contents_url())
            .header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(rows = items.len(), path = %self.config.path, "dataset saved");
            Ok(())
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                message: api_message(response).await,
            })
        }
    }
}

/// Pull the `message` field out of a GitHub error body, falling back to
/// the raw text.
async fn api_message(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => text,
    }
}

#[derive(Debug, Deserialize)]
struct ContentsBlob {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GithubStoreConfig {
        GithubStoreConfig {
            repo: "a-ruivo/books_catalog".to_string(),
            path: "data/catalog.csv".to_string(),
            token: "t0ken".to_string(),
            branch: default_branch(),
            timeout_secs: default_timeout(),
            api_base: None,
        }
    }

    #[test]
    fn test_contents_url() {
        let store = GithubStore::new(config()).unwrap();
        assert_eq!(
            store.contents_url(),
            "https://api.github.com/repos/a-ruivo/books_catalog/contents/data/catalog.csv"
        );
    }

    #[test]
    fn test_api_base_override() {
        let mut config = config();
        config.api_base = Some("http://localhost:9999/".to_string());
        let store = GithubStore::new(config).unwrap();
        assert!(store
            .contents_url()
            .starts_with("http://localhost:9999/repos/"));
    }

    #[test]
    fn test_put_body_omits_sha_for_new_file() {
        let body = PutContents {
            message: "init",
            content: "YQ==".to_string(),
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
    }

    #[test]
    fn test_blob_content_decodes_with_newlines() {
        // The contents API hard-wraps base64 at 60 columns.
        let wrapped = "aWRlbnRpZmllcix0aXRsZQoxMjMs\nRG9tIENhc211cnJvCg==";
        let packed: String = wrapped.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64.decode(packed).unwrap();
        let items = decode_csv(&bytes).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Dom Casmurro"));
    }
}
