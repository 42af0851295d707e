//! In-memory registry of fungible token metadata.
//!
//! A [`TokenRegistry`] merges a read-only default catalog with user-added custom tokens
//! for one connected chain, and answers lookups by address, symbol or asset id.

pub mod address;
pub mod asset_id;
pub mod catalog;
pub mod config;
pub mod error;
pub mod observable;
pub mod registry;
pub mod store;
pub mod token;
pub mod types;

// Re-exports for convenience
pub use asset_id::{AssetIdResolver, PrecompileResolver};
pub use catalog::{CatalogProvider, EmptyCatalog, StaticCatalog};
pub use config::RegistryConfig;
pub use error::{Error, StoreError};
pub use observable::SubscriptionId;
pub use registry::TokenRegistry;
pub use store::{CustomTokenStore, JsonFileStore, MemoryStore};
pub use token::{TokenLookupKey, TokenMeta, TokenSource};
pub use types::descriptor::TokenDescriptor;
pub use types::entry::{CustomTokenRecord, TokenEntry, TokenOrigin};
