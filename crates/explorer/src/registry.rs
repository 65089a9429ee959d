//! Contract registry: per-contract metadata discovered during ingestion,
//! plus the derived lookups layered over the registry and the cache.

use crate::Explorer;
use alloy_primitives::Address;
use bscope_core::types::{ContractRecord, DiscoveryOrigin, Transaction, TxKind, TxRef};
use bscope_core::units::{UNKNOWN_TOKEN_NAME, UNKNOWN_TOKEN_SYMBOL};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Contract records keyed by address, preserving discovery order.
///
/// Discovery order matters: it is the FIFO queue the creator crawler walks,
/// so a crawl visits contracts in the order transactions surfaced them.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    records: HashMap<Address, ContractRecord>,
    order: Vec<Address>,
    call_counts: HashMap<Address, u32>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &Address) -> Option<&ContractRecord> {
        self.records.get(address)
    }

    pub fn get_mut(&mut self, address: &Address) -> Option<&mut ContractRecord> {
        self.records.get_mut(address)
    }

    /// Existing record, or a fresh one with defaults and the given origin.
    pub fn entry(&mut self, address: Address, origin: DiscoveryOrigin) -> &mut ContractRecord {
        match self.records.entry(address) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                self.order.push(address);
                vacant.insert(ContractRecord::new(address, origin))
            }
        }
    }

    /// Bumps the nonempty-call-input counter for `address` and returns it.
    pub fn note_call(&mut self, address: Address) -> u32 {
        let count = self.call_counts.entry(address).or_insert(0);
        *count += 1;
        *count
    }

    /// Snapshot of all addresses in discovery order.
    pub fn addresses(&self) -> Vec<Address> {
        self.order.clone()
    }

    /// Records in discovery order.
    pub fn records(&self) -> impl Iterator<Item = &ContractRecord> {
        self.order.iter().filter_map(|address| self.records.get(address))
    }

    /// Fills any name/symbol still missing from related transaction
    /// references, else the unknown sentinels.
    pub fn reconcile_metadata(&mut self) {
        for record in self.records.values_mut() {
            if record.name.is_none() {
                let from_refs = record.related.iter().find_map(|r| r.token_name.clone());
                record.name = from_refs.or_else(|| Some(UNKNOWN_TOKEN_NAME.to_string()));
            }
            if record.symbol.is_none() {
                let from_refs = record.related.iter().find_map(|r| r.token_symbol.clone());
                record.symbol = from_refs.or_else(|| Some(UNKNOWN_TOKEN_SYMBOL.to_string()));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
        self.call_counts.clear();
    }
}

impl Explorer {
    /// True iff `address` is known to move a fungible token: its record has
    /// related transactions, or the cache holds token transfers for it (in
    /// which case a record is materialized on the spot).
    ///
    /// The call-input heuristic never satisfies this predicate; absence of
    /// an explicit token-transfer signal is authoritative.
    pub fn is_token_contract(&mut self, address: Address) -> bool {
        self.materialize_from_cache(address);
        self.registry
            .get(&address)
            .map_or(false, |record| !record.related.is_empty())
    }

    /// The record for `address`, materializing it from cached token
    /// transfers if the registry has not seen the address yet.
    pub fn token_contract_info(&mut self, address: Address) -> Option<&ContractRecord> {
        self.materialize_from_cache(address);
        self.registry.get(&address)
    }

    /// Union of all cached transactions touching `contract`, sorted
    /// descending by timestamp. A transaction cached under two keys appears
    /// twice; deduplication across cache entries is intentionally not done.
    pub fn contract_transactions(&self, contract: Address) -> Vec<Transaction> {
        let mut matches: Vec<Transaction> = self
            .cache
            .pages()
            .flat_map(|page| page.transactions.iter())
            .filter(|tx| tx.touches(contract))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.time_stamp.cmp(&a.time_stamp));
        matches
    }

    /// Contracts whose creator is `queried`. Computed once by scanning the
    /// registry, then served from the derived index until a registry clear;
    /// the crawler also feeds the index directly as creators resolve.
    pub fn created_contracts(&mut self, queried: Address) -> &HashMap<Address, ContractRecord> {
        if self.created.is_empty() {
            for record in self.registry.records() {
                if record.creator == Some(queried) {
                    self.created.insert(record.address, record.clone());
                }
            }
        }
        &self.created
    }

    /// Backfills a registry record from cached token transactions. No-op if
    /// the registry already has the address or the cache holds nothing for
    /// it.
    fn materialize_from_cache(&mut self, address: Address) {
        if self.registry.get(&address).is_some() {
            return;
        }

        let mut refs: Vec<TxRef> = Vec::new();
        let mut name = None;
        let mut symbol = None;
        let mut decimals = None;
        for page in self.cache.pages() {
            for tx in &page.transactions {
                if tx.kind == TxKind::Token && tx.contract_address == Some(address) {
                    name = name.or_else(|| tx.token_name.clone());
                    symbol = symbol.or_else(|| tx.token_symbol.clone());
                    decimals = decimals.or(tx.token_decimals);
                    refs.push(TxRef::from_tx(tx));
                }
            }
        }
        if refs.is_empty() {
            return;
        }

        tracing::debug!(%address, txs = refs.len(), "materializing contract from cache");
        let record = self.registry.entry(address, DiscoveryOrigin::TokenTransfer);
        record.name = name;
        record.symbol = symbol;
        if let Some(decimals) = decimals {
            record.decimals = decimals;
        }
        for tx_ref in refs {
            record.push_related(tx_ref);
        }
    }
}
