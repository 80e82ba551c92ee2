//! Mock implementations for testing.
//!
//! In-memory, controllable stand-ins for every external collaborator:
//! the persistence store, the metadata providers and the price source.
//! Used by the unit tests in this crate and by the server's integration
//! tests.

mod mock_price_source;
mod mock_provider;
mod mock_store;

pub use mock_price_source::MockPriceSource;
pub use mock_provider::MockProvider;
pub use mock_store::MockCatalogStore;
