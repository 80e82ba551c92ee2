use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::catalog::IdentityKey;
use crate::metadata::{BrasilApiConfig, OpenLibraryConfig};
use crate::pricing::PriceScraperConfig;
use crate::store::{FileStoreConfig, GithubStoreConfig};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub pricing: PriceScraperConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Catalog variant configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Which field(s) uniquely identify a row (default: identifier).
    #[serde(default)]
    pub identity_key: IdentityKey,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Persistence backend type
    pub backend: StoreBackend,
    /// GitHub-specific configuration (required when backend = "github")
    #[serde(default)]
    pub github: Option<GithubStoreConfig>,
    /// File-specific configuration (required when backend = "file")
    #[serde(default)]
    pub file: Option<FileStoreConfig>,
}

/// Available persistence backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Github,
    File,
}

/// Metadata provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub openlibrary: OpenLibraryConfig,
    #[serde(default)]
    pub brasilapi: BrasilApiConfig,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub store: SanitizedStoreConfig,
    pub metadata: MetadataConfig,
    pub pricing: PriceScraperConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStoreConfig {
    pub backend: StoreBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<SanitizedGithubConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileStoreConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGithubConfig {
    pub repo: String,
    pub path: String,
    pub branch: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: config.catalog.clone(),
            store: SanitizedStoreConfig {
                backend: config.store.backend.clone(),
                github: config.store.github.as_ref().map(|g| SanitizedGithubConfig {
                    repo: g.repo.clone(),
                    path: g.path.clone(),
                    branch: g.branch.clone(),
                }),
                file: config.store.file.clone(),
            },
            metadata: config.metadata.clone(),
            pricing: config.pricing.clone(),
        }
    }
}
