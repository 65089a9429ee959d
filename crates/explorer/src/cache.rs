//! Keyed cache of ingested history pages.

use alloy_primitives::Address;
use bscope_core::types::HistoryPage;
use std::collections::HashMap;

/// Cache key: one entry per `(address, page, page_size)` combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub address: Address,
    pub page: u64,
    pub page_size: u64,
}

/// In-memory page cache. Entries are written only after a fully successful
/// ingestion, so a cached page is never partial.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<CacheKey, HistoryPage>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: Address, page: u64, page_size: u64) -> Option<&HistoryPage> {
        self.entries.get(&CacheKey {
            address,
            page,
            page_size,
        })
    }

    pub fn insert(&mut self, key: CacheKey, page: HistoryPage) {
        self.entries.insert(key, page);
    }

    /// Removes entries for one address, or everything.
    pub fn clear(&mut self, address: Option<Address>) {
        match address {
            Some(address) => self.entries.retain(|key, _| key.address != address),
            None => self.entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All cached pages, in no particular order.
    pub fn pages(&self) -> impl Iterator<Item = &HistoryPage> {
        self.entries.values()
    }
}
