use num_bigint::BigUint;

use super::TokenRegistry;
use crate::types::entry::TokenEntry;

impl TokenRegistry {
    /// First entry at `address` (case-insensitive) on `chain_id`, defaulting to the active chain.
    pub fn get_by_address(&self, address: &str, chain_id: Option<u64>) -> Option<&TokenEntry> {
        let chain_id = chain_id.or(self.active_chain_id)?;
        self.iter_entries()
            .find(|e| e.descriptor().matches(address, chain_id))
    }

    /// First entry with `symbol` (case-insensitive) on `chain_id`.
    ///
    /// Symbols are not unique; list order breaks ties, so defaults win over custom tokens.
    pub fn get_by_symbol(&self, symbol: &str, chain_id: Option<u64>) -> Option<&TokenEntry> {
        let chain_id = chain_id.or(self.active_chain_id)?;
        self.iter_entries()
            .find(|e| e.chain_id() == chain_id && e.symbol().eq_ignore_ascii_case(symbol))
    }

    pub fn get_by_asset_id(
        &self,
        asset_id: &BigUint,
        chain_id: Option<u64>,
    ) -> Option<&TokenEntry> {
        let Some(address) = self.resolver.resolve(asset_id) else {
            tracing::debug!(%asset_id, "Asset id has no address representation");
            return None;
        };
        self.get_by_address(&address, chain_id)
    }
}
