use serde::{Deserialize, Serialize};

use crate::address::addresses_eq;

/// Immutable token metadata, in token-list form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: String,

    #[serde(rename = "chainId")]
    pub chain_id: u64,

    pub symbol: String,

    pub decimals: u8,

    pub name: String,

    #[serde(rename = "logoURI")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

impl TokenDescriptor {
    pub fn new(
        address: impl Into<String>,
        chain_id: u64,
        symbol: impl Into<String>,
        decimals: u8,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            chain_id,
            symbol: symbol.into(),
            decimals,
            name: name.into(),
            logo_uri: None,
        }
    }

    pub fn with_logo_uri(mut self, logo_uri: impl Into<String>) -> Self {
        self.logo_uri = Some(logo_uri.into());
        self
    }

    /// True when this descriptor lives at `address` on `chain_id`.
    pub fn matches(&self, address: &str, chain_id: u64) -> bool {
        self.chain_id == chain_id && addresses_eq(&self.address, address)
    }

}
