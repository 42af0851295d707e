use thiserror::Error;

/// Unified error type for the token registry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("token already exists: {address}")]
    AlreadyExists { address: String },

    #[error("custom token not found for chain_id={chain_id}, address={address}")]
    NotFound { address: String, chain_id: u64 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid token lookup key: {0}")]
    InvalidLookupKey(String),
}

/// Errors raised by a custom token store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record not found for chain_id={chain_id}, address={address}")]
    Missing { address: String, chain_id: u64 },
}
