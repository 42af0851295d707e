use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::types::descriptor::TokenDescriptor;

/// Read-only default token list covering every known chain.
pub trait CatalogProvider: Send + Sync {
    fn tokens(&self) -> &[TokenDescriptor];

    /// Catalog tokens for one chain, in list order.
    fn tokens_for_chain(&self, chain_id: u64) -> Vec<TokenDescriptor> {
        self.tokens()
            .iter()
            .filter(|t| t.chain_id == chain_id)
            .cloned()
            .collect()
    }
}

/// A catalog with no tokens.
pub struct EmptyCatalog;

impl CatalogProvider for EmptyCatalog {
    fn tokens(&self) -> &[TokenDescriptor] {
        &[]
    }
}

/// In-memory catalog, loaded once.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tokens: Vec<TokenDescriptor>,
}

/// Accepts both a bare array and the `{ "tokens": [...] }` token-list envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenListDocument {
    List(Vec<TokenDescriptor>),
    Envelope { tokens: Vec<TokenDescriptor> },
}

impl StaticCatalog {
    pub fn new(tokens: Vec<TokenDescriptor>) -> Self {
        Self { tokens }
    }

    /// Parse a token list from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let document: TokenListDocument =
            serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))?;
        let tokens = match document {
            TokenListDocument::List(tokens) => tokens,
            TokenListDocument::Envelope { tokens } => tokens,
        };
        Ok(Self::new(tokens))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            tokens = catalog.tokens.len(),
            "Loaded default token catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl CatalogProvider for StaticCatalog {
    fn tokens(&self) -> &[TokenDescriptor] {
        &self.tokens
    }
}
