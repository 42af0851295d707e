//! Chain-scoped token registry: the merged default + custom view for one connected chain.

mod custom;
mod lookup;

use std::sync::Arc;

use tokio::sync::watch;

use crate::address::addresses_eq;
use crate::asset_id::{AssetIdResolver, PrecompileResolver};
use crate::catalog::{CatalogProvider, EmptyCatalog, StaticCatalog};
use crate::config::RegistryConfig;
use crate::error::Error;
use crate::observable::{Observable, SubscriptionId};
use crate::store::{CustomTokenStore, JsonFileStore};
use crate::types::entry::TokenEntry;

/// Merged token registry for a single active chain.
///
/// Disconnected (the initial state), `entries` is absent: lookups return `None` and
/// mutations are skipped. [`TokenRegistry::connect`] rebuilds the view from the default
/// catalog followed by the stored custom tokens for that chain.
///
/// Mutations take `&mut self`; hosts sharing a registry across threads wrap it in a
/// single `Mutex`.
pub struct TokenRegistry {
    catalog: Arc<dyn CatalogProvider>,
    store: Box<dyn CustomTokenStore>,
    resolver: Box<dyn AssetIdResolver>,
    entries: Observable<Option<Vec<TokenEntry>>>,
    connected: Observable<bool>,
    active_chain_id: Option<u64>,
}

impl TokenRegistry {
    pub fn new(catalog: Arc<dyn CatalogProvider>, store: impl CustomTokenStore + 'static) -> Self {
        Self {
            catalog,
            store: Box::new(store),
            resolver: Box::new(PrecompileResolver::default()),
            entries: Observable::new(None),
            connected: Observable::new(false),
            active_chain_id: None,
        }
    }

    pub fn with_resolver(mut self, resolver: impl AssetIdResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Build a registry from configuration, connecting to `chain_id` when one is set.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, Error> {
        let catalog: Arc<dyn CatalogProvider> = match &config.catalog_path {
            Some(path) => Arc::new(StaticCatalog::from_file(path)?),
            None => Arc::new(EmptyCatalog),
        };
        let resolver = PrecompileResolver::from_hex_prefix(&config.asset_id.prefix)?;
        let mut registry =
            Self::new(catalog, JsonFileStore::new(&config.store_path)).with_resolver(resolver);
        if let Some(chain_id) = config.chain_id {
            registry.connect(chain_id)?;
        }
        Ok(registry)
    }

    /// Replace the view with `chain_id`'s defaults followed by its stored custom tokens.
    ///
    /// A stored record whose address is already present is skipped, so an address appears
    /// at most once. On a store failure the previous state is kept.
    pub fn connect(&mut self, chain_id: u64) -> Result<(), Error> {
        let records = self.store.read_custom_tokens()?;

        let mut entries: Vec<TokenEntry> = self
            .catalog
            .tokens_for_chain(chain_id)
            .into_iter()
            .map(|descriptor| TokenEntry::Default { descriptor })
            .collect();
        let defaults = entries.len();

        for record in records
            .into_iter()
            .filter(|r| r.descriptor.chain_id == chain_id)
        {
            if entries
                .iter()
                .any(|e| addresses_eq(e.address(), &record.descriptor.address))
            {
                tracing::warn!(
                    chain_id,
                    address = %record.descriptor.address,
                    "Skipping stored custom token that shadows an existing entry"
                );
                continue;
            }
            entries.push(record.into());
        }
        let customs = entries.len() - defaults;

        self.active_chain_id = Some(chain_id);
        self.entries.set(Some(entries));
        self.connected.set(true);

        tracing::info!(chain_id, defaults, customs, "Connected token registry");
        Ok(())
    }

    /// Drop the in-memory view. Stored custom tokens are untouched.
    pub fn disconnect(&mut self) {
        let previous = self.active_chain_id.take();
        self.entries.set(None);
        self.connected.set(false);
        tracing::info!(chain_id = ?previous, "Disconnected token registry");
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.get()
    }

    pub fn active_chain_id(&self) -> Option<u64> {
        self.active_chain_id
    }

    /// The merged view, or `None` while disconnected.
    pub fn entries(&self) -> Option<&[TokenEntry]> {
        self.entries.get().as_deref()
    }

    /// Entries for normal display: everything except banned custom tokens.
    pub fn visible_entries(&self) -> Vec<&TokenEntry> {
        self.iter_entries().filter(|e| !e.is_banned()).collect()
    }

    pub fn custom_entries(&self) -> Vec<&TokenEntry> {
        self.iter_entries().filter(|e| e.is_custom()).collect()
    }

    /// Called with the current entries immediately, then after every commit.
    pub fn subscribe_entries<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(Option<&[TokenEntry]>) + Send + 'static,
    {
        self.entries.subscribe(move |entries| listener(entries.as_deref()))
    }

    pub fn subscribe_connected<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.connected.subscribe(move |connected| listener(*connected))
    }

    /// Remove a subscription made through either `subscribe_*` method.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.entries.unsubscribe(id) || self.connected.unsubscribe(id)
    }

    pub fn watch_entries(&self) -> watch::Receiver<Option<Vec<TokenEntry>>> {
        self.entries.watch()
    }

    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.connected.watch()
    }

    fn iter_entries(&self) -> impl Iterator<Item = &TokenEntry> {
        self.entries().unwrap_or_default().iter()
    }

    fn commit(&mut self, entries: Vec<TokenEntry>) {
        self.entries.set(Some(entries));
    }
}

impl std::fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("connected", self.connected.get())
            .field("active_chain_id", &self.active_chain_id)
            .field("entries", &self.entries().map(<[TokenEntry]>::len))
            .finish()
    }
}
