use num_bigint::BigUint;

use crate::address::to_checksum_address;
use crate::error::Error;

/// Converts a protocol-specific numeric asset id into a contract address.
pub trait AssetIdResolver: Send + Sync {
    /// `None` when the id has no address representation.
    fn resolve(&self, asset_id: &BigUint) -> Option<String>;
}

/// Maps an asset id onto a precompile address: a 4-byte prefix followed by the id
/// as a 16-byte big-endian integer.
///
/// With the default `0xffffffff` prefix, asset `42259045809535163221576417993425387648`
/// resolves to `0xFfFFfFff1FcaCBd218EDc0EbA20Fc2308C778080`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecompileResolver {
    prefix: [u8; 4],
}

impl PrecompileResolver {
    pub const DEFAULT_PREFIX: [u8; 4] = [0xff; 4];

    pub fn new(prefix: [u8; 4]) -> Self {
        Self { prefix }
    }

    /// Parse a prefix like `"ffffffff"` or `"0xFFFFFFFE"`.
    pub fn from_hex_prefix(prefix: &str) -> Result<Self, Error> {
        let stripped = prefix
            .strip_prefix("0x")
            .or_else(|| prefix.strip_prefix("0X"))
            .unwrap_or(prefix);
        let bytes = hex::decode(stripped)
            .map_err(|e| Error::Config(format!("invalid asset id prefix {prefix:?}: {e}")))?;
        let prefix: [u8; 4] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            Error::Config(format!(
                "asset id prefix must be 4 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::new(prefix))
    }
}

impl Default for PrecompileResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

impl AssetIdResolver for PrecompileResolver {
    fn resolve(&self, asset_id: &BigUint) -> Option<String> {
        let id_bytes = asset_id.to_bytes_be();
        if id_bytes.len() > 16 {
            return None;
        }
        let mut addr = [0u8; 20];
        addr[..4].copy_from_slice(&self.prefix);
        addr[20 - id_bytes.len()..].copy_from_slice(&id_bytes);
        Some(to_checksum_address(&addr))
    }
}
