//! Address-activity engine: ingestion and normalization, the result cache,
//! the contract registry with its derived lookups, and the
//! bounded-concurrency creator crawler.

pub mod cache;
pub mod crawler;
pub mod history;
pub mod registry;

#[cfg(test)]
pub(crate) mod testsupport;

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use bscope_core::error::BscopeResult;
use bscope_core::types::{ContractRecord, CrawlProgress, HistoryPage};
use bscope_provider::ChainSource;

use cache::ResultCache;
use crawler::ProgressHandle;
use registry::ContractRegistry;

pub use cache::CacheKey;

/// Creator-lookup concurrency used when the backend config is unavailable.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Exploration state for one backend: the result cache, the contract
/// registry, crawl progress, and the address currently under inspection.
///
/// All of the original viewer's process-wide mutable state lives here as
/// explicit owned fields with a defined clear lifecycle; nothing outside
/// this struct mutates them.
pub struct Explorer {
    source: Arc<dyn ChainSource>,
    cache: ResultCache,
    registry: ContractRegistry,
    /// Derived index of contracts created by the queried address. Filled by
    /// the crawler and lazily by [`Explorer::created_contracts`].
    created: HashMap<Address, ContractRecord>,
    progress: ProgressHandle,
    concurrency: usize,
    queried: Option<Address>,
}

impl Explorer {
    pub fn new(source: Arc<dyn ChainSource>) -> Self {
        Self {
            source,
            cache: ResultCache::new(),
            registry: ContractRegistry::new(),
            created: HashMap::new(),
            progress: ProgressHandle::default(),
            concurrency: DEFAULT_CONCURRENCY,
            queried: None,
        }
    }

    /// Override the creator-lookup concurrency limit (floored at 1).
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Pulls the concurrency limit from the backend's config endpoint.
    pub async fn load_runtime_config(&mut self) -> BscopeResult<()> {
        let config = self.source.runtime_config().await?;
        self.concurrency = config.bsc_scan.max_concurrent.max(1);
        tracing::info!(concurrency = self.concurrency, "runtime config applied");
        Ok(())
    }

    /// The address whose history was last ingested.
    pub fn queried_address(&self) -> Option<Address> {
        self.queried
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Current crawl progress snapshot.
    pub fn progress(&self) -> CrawlProgress {
        self.progress.snapshot()
    }

    /// Cloneable handle for polling progress while a crawl runs.
    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Pure cache lookup; never triggers a fetch.
    pub fn cached(&self, address: Address, page: u64, page_size: u64) -> Option<&HistoryPage> {
        self.cache.get(address, page, page_size)
    }

    /// Drops cached pages -- for one address, or all of them. With
    /// `include_registry`, also empties the contract registry and the
    /// created-contracts index.
    pub fn clear(&mut self, address: Option<Address>, include_registry: bool) {
        self.cache.clear(address);
        if include_registry {
            self.registry.clear();
            self.created.clear();
        }
    }
}
