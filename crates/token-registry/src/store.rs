use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::address::normalize_address;
use crate::error::StoreError;
use crate::types::descriptor::TokenDescriptor;
use crate::types::entry::CustomTokenRecord;

/// Durable store for custom tokens, keyed by lower-cased address and chain id.
///
/// Records survive registry disconnects; the registry re-reads them on every connect.
pub trait CustomTokenStore: Send {
    /// Every stored record, across all chains, in insertion order.
    fn read_custom_tokens(&self) -> Result<Vec<CustomTokenRecord>, StoreError>;

    /// Store a new unbanned record. An existing record under the same key is replaced.
    fn create_custom_token(&mut self, descriptor: &TokenDescriptor) -> Result<(), StoreError>;

    fn delete_custom_token(&mut self, record: &CustomTokenRecord) -> Result<(), StoreError>;

    /// Replace the record stored under `address` on the record's chain.
    fn update_custom_token(
        &mut self,
        address: &str,
        record: &CustomTokenRecord,
    ) -> Result<(), StoreError>;
}

fn position_of(records: &[CustomTokenRecord], address: &str, chain_id: u64) -> Option<usize> {
    records
        .iter()
        .position(|r| r.descriptor.matches(address, chain_id))
}

fn upsert(records: &mut Vec<CustomTokenRecord>, descriptor: &TokenDescriptor) {
    let record = CustomTokenRecord::new(descriptor.clone());
    match position_of(records, &descriptor.address, descriptor.chain_id) {
        Some(idx) => records[idx] = record,
        None => records.push(record),
    }
}

fn remove(
    records: &mut Vec<CustomTokenRecord>,
    record: &CustomTokenRecord,
) -> Result<(), StoreError> {
    let descriptor = &record.descriptor;
    let before = records.len();
    records.retain(|r| !r.descriptor.matches(&descriptor.address, descriptor.chain_id));
    if records.len() == before {
        return Err(missing(&descriptor.address, descriptor.chain_id));
    }
    Ok(())
}

fn replace(
    records: &mut [CustomTokenRecord],
    address: &str,
    record: &CustomTokenRecord,
) -> Result<(), StoreError> {
    let chain_id = record.descriptor.chain_id;
    let idx = position_of(records, address, chain_id).ok_or_else(|| missing(address, chain_id))?;
    records[idx] = record.clone();
    Ok(())
}

fn missing(address: &str, chain_id: u64) -> StoreError {
    StoreError::Missing {
        address: normalize_address(address),
        chain_id,
    }
}

/// In-memory store. Clones share the same records, so a handle kept by the caller
/// observes every write the registry makes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<CustomTokenRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<CustomTokenRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<CustomTokenRecord> {
        self.lock().clone()
    }

    pub fn contains(&self, address: &str, chain_id: u64) -> bool {
        position_of(&self.lock(), address, chain_id).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CustomTokenRecord>> {
        // Writes cannot panic midway, so a poisoned guard still holds valid records.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CustomTokenStore for MemoryStore {
    fn read_custom_tokens(&self) -> Result<Vec<CustomTokenRecord>, StoreError> {
        Ok(self.records())
    }

    fn create_custom_token(&mut self, descriptor: &TokenDescriptor) -> Result<(), StoreError> {
        upsert(&mut self.lock(), descriptor);
        Ok(())
    }

    fn delete_custom_token(&mut self, record: &CustomTokenRecord) -> Result<(), StoreError> {
        remove(&mut self.lock(), record)
    }

    fn update_custom_token(
        &mut self,
        address: &str,
        record: &CustomTokenRecord,
    ) -> Result<(), StoreError> {
        replace(&mut self.lock(), address, record)
    }
}

/// Store backed by a JSON array on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<CustomTokenRecord>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(Vec::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a sibling temp file and rename it over the target.
    fn save(&self, records: &[CustomTokenRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "Saved custom token store"
        );
        Ok(())
    }
}

impl CustomTokenStore for JsonFileStore {
    fn read_custom_tokens(&self) -> Result<Vec<CustomTokenRecord>, StoreError> {
        self.load()
    }

    fn create_custom_token(&mut self, descriptor: &TokenDescriptor) -> Result<(), StoreError> {
        let mut records = self.load()?;
        upsert(&mut records, descriptor);
        self.save(&records)
    }

    fn delete_custom_token(&mut self, record: &CustomTokenRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        remove(&mut records, record)?;
        self.save(&records)
    }

    fn update_custom_token(
        &mut self,
        address: &str,
        record: &CustomTokenRecord,
    ) -> Result<(), StoreError> {
        let mut records = self.load()?;
        replace(&mut records, address, record)?;
        self.save(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> TokenDescriptor {
        TokenDescriptor::new("0xBBB", 1, "BAR", 18, "Bar")
    }

    #[test]
    fn test_memory_store_shares_records_between_clones() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        store.create_custom_token(&bar()).unwrap();
        assert!(handle.contains("0xbbb", 1));
        assert!(!handle.contains("0xbbb", 2));
    }

    #[test]
    fn test_create_replaces_same_key() {
        let mut store = MemoryStore::new();
        store.create_custom_token(&bar()).unwrap();
        let mut renamed = bar();
        renamed.address = "0xbbb".to_string();
        renamed.name = "Bar v2".to_string();
        store.create_custom_token(&renamed).unwrap();

        let records = store.read_custom_tokens().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].descriptor.name, "Bar v2");
    }

    #[test]
    fn test_same_address_on_two_chains_are_distinct() {
        let mut store = MemoryStore::new();
        store.create_custom_token(&bar()).unwrap();
        let mut other_chain = bar();
        other_chain.chain_id = 2;
        store.create_custom_token(&other_chain).unwrap();
        assert_eq!(store.records().len(), 2);

        store
            .delete_custom_token(&CustomTokenRecord::new(other_chain))
            .unwrap();
        assert!(store.contains("0xbbb", 1));
        assert!(!store.contains("0xbbb", 2));
    }

    #[test]
    fn test_update_and_delete_missing() {
        let mut store = MemoryStore::new();
        let record = CustomTokenRecord::new(bar());
        assert!(matches!(
            store.update_custom_token("0xbbb", &record),
            Err(StoreError::Missing { chain_id: 1, .. })
        ));
        assert!(matches!(
            store.delete_custom_token(&record),
            Err(StoreError::Missing { .. })
        ));
    }

    #[test]
    fn test_json_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("custom_tokens.json");

        let mut store = JsonFileStore::new(&path);
        assert!(store.read_custom_tokens().unwrap().is_empty());
        store.create_custom_token(&bar()).unwrap();

        let banned = CustomTokenRecord {
            descriptor: bar(),
            banned: true,
        };
        store.update_custom_token("0xbbb", &banned).unwrap();

        let reopened = JsonFileStore::new(&path);
        let records = reopened.read_custom_tokens().unwrap();
        assert_eq!(records, vec![banned.clone()]);

        let mut reopened = reopened;
        reopened.delete_custom_token(&banned).unwrap();
        assert!(JsonFileStore::new(&path)
            .read_custom_tokens()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_tokens.json");
        // A non-empty directory at the target makes the rename fail.
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.save(&[CustomTokenRecord::new(bar())]).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_tokens.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.read_custom_tokens(),
            Err(StoreError::Parse(_))
        ));
    }
}
