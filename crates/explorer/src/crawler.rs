//! Bounded-concurrency creator discovery over the contract registry.
//!
//! One lookup per contract still missing a creator, throttled by a fair
//! semaphore so at most `concurrency` requests are in flight. Tasks only
//! fetch; a single drain loop applies every result, making it the sole
//! writer of registry, created-index, and progress state.

use crate::Explorer;
use alloy_primitives::Address;
use bscope_core::error::BscopeResult;
use bscope_core::types::CrawlProgress;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Cloneable live view of a crawl. Counters are monotonic within a run and
/// reset when the next run begins.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<ProgressState>,
}

#[derive(Debug, Default)]
struct ProgressState {
    querying: AtomicBool,
    total: AtomicU64,
    completed: AtomicU64,
    with_creator: AtomicU64,
}

impl ProgressHandle {
    fn begin(&self, total: u64) {
        self.inner.completed.store(0, Ordering::Relaxed);
        self.inner.with_creator.store(0, Ordering::Relaxed);
        self.inner.total.store(total, Ordering::Relaxed);
        self.inner.querying.store(true, Ordering::Relaxed);
    }

    fn task_done(&self, resolved: bool) {
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
        if resolved {
            self.inner.with_creator.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn finish(&self) {
        self.inner.querying.store(false, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CrawlProgress {
        CrawlProgress {
            is_querying: self.inner.querying.load(Ordering::Relaxed),
            total: self.inner.total.load(Ordering::Relaxed),
            completed: self.inner.completed.load(Ordering::Relaxed),
            with_creator: self.inner.with_creator.load(Ordering::Relaxed),
        }
    }
}

impl Explorer {
    /// Resolves the creator of every registry entry, at most `concurrency`
    /// lookups in flight.
    ///
    /// Records that already carry a creator are counted immediately without
    /// a network call -- cached knowledge is never re-validated, so a rerun
    /// retries only contracts a previous run failed to resolve. Per-contract
    /// failures are logged and counted, never fatal. After the queue drains,
    /// missing token names/symbols are reconciled to their sentinels.
    /// Returns the final progress snapshot.
    pub async fn query_all_contract_creators(&mut self) -> BscopeResult<CrawlProgress> {
        let queue = self.registry.addresses();
        self.progress.begin(queue.len() as u64);
        tracing::info!(
            contracts = queue.len(),
            concurrency = self.concurrency,
            "creator crawl started"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency.max(1)));
        let mut lookups = JoinSet::new();

        for address in queue {
            let resolved = self
                .registry
                .get(&address)
                .and_then(|record| record.creator);
            if resolved.is_some() {
                self.progress.task_done(true);
                continue;
            }

            let source = self.source.clone();
            let permits = semaphore.clone();
            lookups.spawn(async move {
                let _permit = permits.acquire().await.unwrap();
                let info = source.contract_info(address).await;
                (address, info)
            });
        }

        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((address, Ok(info))) => {
                    let creator = info.resolved_creator();
                    self.apply_creator(address, creator);
                    self.progress.task_done(creator.is_some());
                }
                Ok((address, Err(e))) => {
                    tracing::warn!(%address, error = %e, "creator lookup failed");
                    self.progress.task_done(false);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "creator lookup task panicked");
                    self.progress.task_done(false);
                }
            }
        }

        self.registry.reconcile_metadata();
        self.progress.finish();

        let snapshot = self.progress.snapshot();
        tracing::info!(
            completed = snapshot.completed,
            with_creator = snapshot.with_creator,
            "creator crawl finished"
        );
        Ok(snapshot)
    }

    fn apply_creator(&mut self, address: Address, creator: Option<Address>) {
        let Some(creator) = creator else {
            tracing::debug!(%address, "no creator resolved");
            return;
        };
        let queried = self.queried;
        if let Some(record) = self.registry.get_mut(&address) {
            record.creator = Some(creator);
            if queried == Some(creator) {
                record.created_by_queried = true;
                self.created.insert(address, record.clone());
            }
        }
    }
}
