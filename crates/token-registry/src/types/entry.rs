use serde::{Deserialize, Serialize};

use super::descriptor::TokenDescriptor;

/// Persisted form of a user-added token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTokenRecord {
    #[serde(flatten)]
    pub descriptor: TokenDescriptor,

    #[serde(default)]
    pub banned: bool,
}

impl CustomTokenRecord {
    pub fn new(descriptor: TokenDescriptor) -> Self {
        Self {
            descriptor,
            banned: false,
        }
    }
}

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenOrigin {
    Default,
    Custom,
}

/// A token in the merged registry view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEntry {
    /// From the default catalog. Never mutated or removed.
    Default { descriptor: TokenDescriptor },
    /// User-added, durably stored, removable and bannable.
    Custom {
        descriptor: TokenDescriptor,
        banned: bool,
    },
}

impl TokenEntry {
    pub fn descriptor(&self) -> &TokenDescriptor {
        match self {
            TokenEntry::Default { descriptor } | TokenEntry::Custom { descriptor, .. } => {
                descriptor
            }
        }
    }

    pub fn origin(&self) -> TokenOrigin {
        match self {
            TokenEntry::Default { .. } => TokenOrigin::Default,
            TokenEntry::Custom { .. } => TokenOrigin::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TokenEntry::Custom { .. })
    }

    /// Ban flag; `None` for default entries, which have no ban status.
    pub fn banned(&self) -> Option<bool> {
        match self {
            TokenEntry::Default { .. } => None,
            TokenEntry::Custom { banned, .. } => Some(*banned),
        }
    }

    pub fn is_banned(&self) -> bool {
        self.banned().unwrap_or(false)
    }

    pub fn address(&self) -> &str {
        &self.descriptor().address
    }

    pub fn symbol(&self) -> &str {
        &self.descriptor().symbol
    }

    pub fn chain_id(&self) -> u64 {
        self.descriptor().chain_id
    }

    /// The store record for a custom entry.
    pub fn to_record(&self) -> Option<CustomTokenRecord> {
        match self {
            TokenEntry::Default { .. } => None,
            TokenEntry::Custom { descriptor, banned } => Some(CustomTokenRecord {
                descriptor: descriptor.clone(),
                banned: *banned,
            }),
        }
    }
}

impl From<CustomTokenRecord> for TokenEntry {
    fn from(record: CustomTokenRecord) -> Self {
        TokenEntry::Custom {
            descriptor: record.descriptor,
            banned: record.banned,
        }
    }
}
