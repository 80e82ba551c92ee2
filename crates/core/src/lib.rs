pub mod catalog;
pub mod config;
pub mod import;
pub mod metadata;
pub mod pricing;
pub mod store;
pub mod testing;

pub use catalog::{
    add_item, decode_csv, dedup_exact, encode_csv, merge, CatalogError, CatalogItem, IdentityKey,
    PriceFlag,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    MetadataConfig, SanitizedConfig, ServerConfig, StoreBackend, StoreConfig,
};
pub use import::{import_spreadsheet, ImportError, ImportOutcome};
pub use metadata::{
    BrasilApiProvider, MetadataError, MetadataProvider, MetadataResolver, OpenLibraryProvider,
    ProviderResponse,
};
pub use pricing::{
    enrich_prices, EnrichReport, PriceError, PriceScraper, PriceScraperConfig, PriceSource,
};
pub use store::{CatalogStore, FileStore, FileStoreConfig, GithubStore, GithubStoreConfig, StoreError};
