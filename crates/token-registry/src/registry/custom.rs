use super::TokenRegistry;
use crate::address::{addresses_eq, normalize_address};
use crate::error::Error;
use crate::types::descriptor::TokenDescriptor;
use crate::types::entry::{CustomTokenRecord, TokenEntry};

impl TokenRegistry {
    /// Persist a new custom token and, when it belongs to the active chain, append it.
    ///
    /// Fails with [`Error::AlreadyExists`] when any loaded entry already uses the address,
    /// compared case-insensitively, or when a token for another chain is already stored.
    /// Tokens for other chains are stored but stay hidden until that chain is connected.
    /// Skipped while disconnected.
    pub fn add_custom_token(&mut self, descriptor: TokenDescriptor) -> Result<(), Error> {
        let Some(entries) = self.entries.get() else {
            tracing::debug!(address = %descriptor.address, "Registry not connected, skipping add");
            return Ok(());
        };
        if entries
            .iter()
            .any(|e| addresses_eq(e.address(), &descriptor.address))
        {
            return Err(Error::AlreadyExists {
                address: normalize_address(&descriptor.address),
            });
        }
        let mut next = entries.clone();

        let active = Some(descriptor.chain_id) == self.active_chain_id;
        if !active
            && self
                .store
                .read_custom_tokens()?
                .iter()
                .any(|r| r.descriptor.matches(&descriptor.address, descriptor.chain_id))
        {
            return Err(Error::AlreadyExists {
                address: normalize_address(&descriptor.address),
            });
        }

        self.store.create_custom_token(&descriptor)?;

        if !active {
            tracing::debug!(
                address = %descriptor.address,
                chain_id = descriptor.chain_id,
                "Stored custom token for inactive chain"
            );
            return Ok(());
        }

        tracing::info!(
            address = %descriptor.address,
            symbol = %descriptor.symbol,
            chain_id = descriptor.chain_id,
            "Added custom token"
        );
        next.push(TokenEntry::Custom {
            descriptor,
            banned: false,
        });
        self.commit(next);
        Ok(())
    }

    /// Delete a custom token from the store and the view.
    ///
    /// Default tokens are never removable and report [`Error::NotFound`].
    pub fn remove_custom_token(&mut self, address: &str, chain_id: u64) -> Result<(), Error> {
        let Some(record) = self.custom_record(address, chain_id)? else {
            return Ok(());
        };

        self.store.delete_custom_token(&record)?;

        let next: Vec<TokenEntry> = self
            .iter_entries()
            .filter(|e| !addresses_eq(e.address(), address))
            .cloned()
            .collect();
        self.commit(next);

        tracing::info!(address = %record.descriptor.address, chain_id, "Removed custom token");
        Ok(())
    }

    /// Set the ban flag on a custom token, keeping its position in the view.
    pub fn set_custom_token_ban_status(
        &mut self,
        address: &str,
        chain_id: u64,
        banned: bool,
    ) -> Result<(), Error> {
        let Some(record) = self.custom_record(address, chain_id)? else {
            return Ok(());
        };
        let updated = CustomTokenRecord { banned, ..record };

        self.store
            .update_custom_token(&updated.descriptor.address, &updated)?;

        let mut next: Vec<TokenEntry> = self.iter_entries().cloned().collect();
        if let Some(slot) = next
            .iter_mut()
            .find(|e| e.descriptor().matches(address, chain_id))
        {
            *slot = updated.into();
        }
        self.commit(next);

        tracing::info!(address, chain_id, banned, "Updated custom token ban status");
        Ok(())
    }

    /// The stored record behind a custom entry.
    ///
    /// `Ok(None)` while disconnected; [`Error::NotFound`] for a missing or default entry.
    fn custom_record(
        &self,
        address: &str,
        chain_id: u64,
    ) -> Result<Option<CustomTokenRecord>, Error> {
        if self.entries.get().is_none() {
            tracing::debug!(address, chain_id, "Registry not connected, skipping");
            return Ok(None);
        }
        self.get_by_address(address, Some(chain_id))
            .and_then(TokenEntry::to_record)
            .map(Some)
            .ok_or_else(|| Error::NotFound {
                address: normalize_address(address),
                chain_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::error::StoreError;
    use crate::store::{CustomTokenStore, MemoryStore};

    fn connected(store: MemoryStore) -> TokenRegistry {
        let catalog = StaticCatalog::new(vec![TokenDescriptor::new("0xAAA", 1, "FOO", 18, "Foo")]);
        let mut registry = TokenRegistry::new(Arc::new(catalog), store);
        registry.connect(1).unwrap();
        registry
    }

    fn bar(chain_id: u64) -> TokenDescriptor {
        TokenDescriptor::new("0xBBB", chain_id, "BAR", 18, "Bar")
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl CustomTokenStore for ReadOnlyStore {
        fn read_custom_tokens(&self) -> Result<Vec<CustomTokenRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn create_custom_token(&mut self, _: &TokenDescriptor) -> Result<(), StoreError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn delete_custom_token(&mut self, _: &CustomTokenRecord) -> Result<(), StoreError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn update_custom_token(
            &mut self,
            _: &str,
            _: &CustomTokenRecord,
        ) -> Result<(), StoreError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn test_add_appends_unbanned_custom_entry() {
        let store = MemoryStore::new();
        let mut registry = connected(store.clone());
        registry.add_custom_token(bar(1)).unwrap();

        let entries = registry.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].banned(), Some(false));
        assert!(store.contains("0xbbb", 1));
    }

    #[test]
    fn test_add_duplicate_is_case_insensitive() {
        let store = MemoryStore::new();
        let mut registry = connected(store.clone());

        let mut shadow = bar(1);
        shadow.address = "0xaaa".to_string();
        let err = registry.add_custom_token(shadow).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { ref address } if address == "0xaaa"));
        assert!(store.records().is_empty());
        assert_eq!(registry.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_re_adding_stored_token_for_inactive_chain_keeps_ban() {
        let store = MemoryStore::new();
        let mut registry = connected(store.clone());
        registry.connect(2).unwrap();
        registry.add_custom_token(bar(2)).unwrap();
        registry.set_custom_token_ban_status("0xbbb", 2, true).unwrap();

        registry.connect(1).unwrap();
        let err = registry.add_custom_token(bar(2)).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { ref address } if address == "0xbbb"));
        assert_eq!(store.records().len(), 1);
        assert!(store.records()[0].banned);

        registry.connect(2).unwrap();
        assert_eq!(
            registry.get_by_address("0xbbb", None).unwrap().banned(),
            Some(true)
        );
    }

    #[test]
    fn test_add_while_disconnected_is_skipped() {
        let store = MemoryStore::new();
        let mut registry = connected(store.clone());
        registry.disconnect();
        registry.add_custom_token(bar(1)).unwrap();
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_failed_store_write_leaves_view_untouched() {
        let catalog = StaticCatalog::new(vec![]);
        let mut registry = TokenRegistry::new(Arc::new(catalog), ReadOnlyStore);
        registry.connect(1).unwrap();

        let err = registry.add_custom_token(bar(1)).unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Io(_))));
        assert!(registry.entries().unwrap().is_empty());
    }

    #[test]
    fn test_remove_default_is_not_found() {
        let mut registry = connected(MemoryStore::new());
        let err = registry.remove_custom_token("0xaaa", 1).unwrap_err();
        assert!(matches!(err, Error::NotFound { chain_id: 1, .. }));
        assert_eq!(registry.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_custom_token() {
        let store = MemoryStore::new();
        let mut registry = connected(store.clone());
        registry.add_custom_token(bar(1)).unwrap();

        registry.remove_custom_token("0xbbb", 1).unwrap();
        assert!(registry.get_by_address("0xBBB", Some(1)).is_none());
        assert!(!store.contains("0xbbb", 1));

        let err = registry.remove_custom_token("0xbbb", 1).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_ban_keeps_position() {
        let store = MemoryStore::new();
        let mut registry = connected(store.clone());
        registry.add_custom_token(bar(1)).unwrap();
        registry
            .add_custom_token(TokenDescriptor::new("0xEEE", 1, "EEE", 18, "Eee"))
            .unwrap();

        registry.set_custom_token_ban_status("0xBbB", 1, true).unwrap();

        let entries = registry.entries().unwrap();
        assert_eq!(entries[1].address(), "0xBBB");
        assert_eq!(entries[1].banned(), Some(true));
        assert_eq!(entries[2].banned(), Some(false));
        assert!(store.records()[0].banned);
        assert_eq!(registry.visible_entries().len(), 2);
    }

    #[test]
    fn test_ban_default_is_not_found() {
        let mut registry = connected(MemoryStore::new());
        let err = registry
            .set_custom_token_ban_status("0xAAA", 1, true)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(registry.entries().unwrap()[0].banned(), None);
    }
}
