//! Registry configuration, loaded from TOML.
//!
//! ```toml
//! catalog_path = "tokens.json"
//! store_path = "custom_tokens.json"
//! chain_id = 1284
//!
//! [asset_id]
//! prefix = "ffffffff"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Default token list (JSON). Without it the registry only holds custom tokens.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// JSON file holding user-added tokens.
    pub store_path: PathBuf,

    #[serde(default)]
    pub asset_id: AssetIdConfig,

    /// Chain to connect to on startup.
    #[serde(default)]
    pub chain_id: Option<u64>,
}

/// Asset id → address mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetIdConfig {
    /// Hex-encoded 4-byte address prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "ffffffff".to_string()
}

impl Default for AssetIdConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "Loaded registry config");
        Ok(config)
    }
}
