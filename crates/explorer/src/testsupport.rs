//! In-memory [`ChainSource`] for unit tests: canned transfer streams,
//! configurable creator answers, injected failures, and in-flight
//! accounting for concurrency assertions.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use bscope_core::error::{BscopeError, BscopeResult};
use bscope_provider::wire::{
    ContractInfo, CreatorEntry, NativeTransfer, RuntimeConfig, TokenTransfer, VerificationStatus,
};
use bscope_provider::ChainSource;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) struct MockSource {
    native: Vec<NativeTransfer>,
    tokens: Vec<TokenTransfer>,
    fail_native: bool,
    lookup_delay: Duration,
    shared: Arc<SharedState>,
}

/// Observation state that outlives the `Arc<dyn ChainSource>` handed to the
/// explorer, so tests can assert on it after the fact.
#[derive(Default)]
pub(crate) struct SharedState {
    creators: Mutex<HashMap<Address, Address>>,
    failing: Mutex<HashSet<Address>>,
    lookup_counts: Mutex<HashMap<Address, u32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SharedState {
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn lookup_count(&self, contract: Address) -> u32 {
        self.lookup_counts
            .lock()
            .unwrap()
            .get(&contract)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }
}

impl MockSource {
    pub(crate) fn new() -> Self {
        Self {
            native: Vec::new(),
            tokens: Vec::new(),
            fail_native: false,
            lookup_delay: Duration::ZERO,
            shared: Arc::new(SharedState::default()),
        }
    }

    pub(crate) fn with_native(mut self, native: Vec<NativeTransfer>) -> Self {
        self.native = native;
        self
    }

    pub(crate) fn with_tokens(mut self, tokens: Vec<TokenTransfer>) -> Self {
        self.tokens = tokens;
        self
    }

    pub(crate) fn failing_native(mut self) -> Self {
        self.fail_native = true;
        self
    }

    pub(crate) fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }

    pub(crate) fn set_creator(&self, contract: Address, creator: Address) {
        self.shared
            .creators
            .lock()
            .unwrap()
            .insert(contract, creator);
    }

    pub(crate) fn fail_creator(&self, contract: Address) {
        self.shared.failing.lock().unwrap().insert(contract);
    }

    pub(crate) fn shared(&self) -> Arc<SharedState> {
        self.shared.clone()
    }
}

#[async_trait]
impl ChainSource for MockSource {
    async fn runtime_config(&self) -> BscopeResult<RuntimeConfig> {
        Ok(RuntimeConfig::default())
    }

    async fn native_transfers(
        &self,
        _address: Address,
        _page: u64,
        _offset: u64,
    ) -> BscopeResult<Vec<NativeTransfer>> {
        if self.fail_native {
            return Err(BscopeError::Backend("injected native failure".into()));
        }
        Ok(self.native.clone())
    }

    async fn token_transfers(
        &self,
        _address: Address,
        _page: u64,
        _offset: u64,
    ) -> BscopeResult<Vec<TokenTransfer>> {
        Ok(self.tokens.clone())
    }

    async fn contract_info(&self, contract: Address) -> BscopeResult<ContractInfo> {
        let shared = &self.shared;
        *shared
            .lookup_counts
            .lock()
            .unwrap()
            .entry(contract)
            .or_insert(0) += 1;

        let current = shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        shared.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.lookup_delay.is_zero() {
            tokio::time::sleep(self.lookup_delay).await;
        }
        shared.in_flight.fetch_sub(1, Ordering::SeqCst);

        if shared.failing.lock().unwrap().contains(&contract) {
            return Err(BscopeError::Backend(format!(
                "injected failure for {contract}"
            )));
        }

        let creator = shared.creators.lock().unwrap().get(&contract).copied();
        Ok(ContractInfo {
            creator: creator
                .map(|c| {
                    vec![CreatorEntry {
                        contract_creator: c.to_string(),
                        tx_hash: String::new(),
                    }]
                })
                .unwrap_or_default(),
            ..ContractInfo::default()
        })
    }

    async fn verify_burn(&self, _tx_hash: &str) -> BscopeResult<serde_json::Value> {
        Ok(serde_json::json!({ "status": "ok" }))
    }

    async fn verification_status(&self) -> BscopeResult<VerificationStatus> {
        Ok(VerificationStatus::default())
    }
}

// ---------------------------------------------------------------------------
// Wire-record builders
// ---------------------------------------------------------------------------

pub(crate) fn addr(n: u64) -> Address {
    Address::from_word(B256::from(U256::from(n)))
}

pub(crate) fn hash(n: u64) -> B256 {
    B256::from(U256::from(n))
}

pub(crate) fn native_tx(
    n: u64,
    time_stamp: u64,
    from: Address,
    to: Address,
    value: &str,
) -> NativeTransfer {
    NativeTransfer {
        hash: hash(n).to_string(),
        block_number: n.to_string(),
        time_stamp: time_stamp.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        value: value.to_string(),
        input: String::new(),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn token_tx(
    n: u64,
    time_stamp: u64,
    from: Address,
    to: Address,
    contract: Address,
    value: &str,
    symbol: &str,
    name: &str,
    decimals: &str,
) -> TokenTransfer {
    TokenTransfer {
        hash: hash(n).to_string(),
        block_number: n.to_string(),
        time_stamp: time_stamp.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        value: value.to_string(),
        contract_address: contract.to_string(),
        token_name: name.to_string(),
        token_symbol: symbol.to_string(),
        token_decimal: decimals.to_string(),
    }
}
