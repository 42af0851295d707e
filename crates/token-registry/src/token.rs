use std::fmt;
use std::str::FromStr;

use crate::address::normalize_address;
use crate::error::Error;
use crate::registry::TokenRegistry;
use crate::types::descriptor::TokenDescriptor;

/// Token metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMeta {
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
}

impl From<&TokenDescriptor> for TokenMeta {
    fn from(descriptor: &TokenDescriptor) -> Self {
        Self {
            symbol: descriptor.symbol.clone(),
            decimals: descriptor.decimals,
            name: descriptor.name.clone(),
        }
    }
}

/// Normalized token lookup key (CAIP-19 style: `eip155:{chain_id}/erc20:{address}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenLookupKey {
    pub chain_id: u64,
    pub address: String,
}

impl TokenLookupKey {
    /// Create a lookup key from chain ID and address.
    pub fn new(chain_id: u64, address: &str) -> Self {
        Self {
            chain_id,
            address: normalize_address(address),
        }
    }
}

impl fmt::Display for TokenLookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eip155:{}/erc20:{}", self.chain_id, self.address)
    }
}

impl FromStr for TokenLookupKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidLookupKey(s.to_string());
        let rest = s.strip_prefix("eip155:").ok_or_else(invalid)?;
        let (chain, address) = rest.split_once("/erc20:").ok_or_else(invalid)?;
        let chain_id = chain.parse().map_err(|_| invalid())?;
        if address.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(chain_id, address))
    }
}

/// Trait for token metadata providers.
pub trait TokenSource {
    fn lookup(&self, key: &TokenLookupKey) -> Option<TokenMeta>;
}

/// Serves metadata for any entry on the connected chain, banned custom tokens included.
impl TokenSource for TokenRegistry {
    fn lookup(&self, key: &TokenLookupKey) -> Option<TokenMeta> {
        self.get_by_address(&key.address, Some(key.chain_id))
            .map(|entry| TokenMeta::from(entry.descriptor()))
    }
}
