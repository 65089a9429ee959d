//! Transaction ingestion: fetch both transfer streams for an address,
//! annotate and merge them, and record contract-registry side effects.

use crate::cache::CacheKey;
use crate::Explorer;
use alloy_primitives::Address;
use bscope_core::error::{BscopeError, BscopeResult};
use bscope_core::types::{
    Direction, DiscoveryOrigin, HistoryPage, Pagination, Transaction, TxKind, TxRef,
};
use bscope_core::units::{
    format_display_value, NATIVE_DECIMALS, NATIVE_SYMBOL, UNKNOWN_TOKEN_SYMBOL,
};
use bscope_provider::wire::{
    parse_address, parse_decimals, parse_hash, parse_u256, parse_u64, NativeTransfer,
    TokenTransfer,
};

/// Call-input sightings before an address is flagged as a likely contract.
const CALL_HEURISTIC_THRESHOLD: u32 = 3;

impl Explorer {
    /// Fetches one page of merged native + token activity for `address`.
    ///
    /// Both streams are fetched, annotated relative to `address`, merged,
    /// and sorted descending by timestamp. Token transfers feed the contract
    /// registry. The result is cached under `(address, page, page_size)`;
    /// any fetch failure aborts without touching the cache.
    pub async fn fetch_transactions(
        &mut self,
        address: Address,
        page: u64,
        page_size: u64,
    ) -> BscopeResult<HistoryPage> {
        if page == 0 {
            return Err(BscopeError::InvalidInput("page must be >= 1".into()));
        }
        if page_size == 0 {
            return Err(BscopeError::InvalidInput("page size must be >= 1".into()));
        }

        self.queried = Some(address);
        tracing::info!(%address, page, page_size, "fetching transaction history");

        let native = self.source.native_transfers(address, page, page_size).await?;
        let tokens = self.source.token_transfers(address, page, page_size).await?;

        let mut transactions = Vec::with_capacity(native.len() + tokens.len());

        for raw in &native {
            transactions.push(normalize_native(raw, address));
            self.note_call_input(raw);
        }

        for raw in &tokens {
            let tx = normalize_token(raw, address);
            if let Some(contract) = tx.contract_address {
                self.record_token_contract(contract, &tx);
            }
            transactions.push(tx);
        }

        // Stable sort: ties keep their native-before-token merge order.
        transactions.sort_by(|a, b| b.time_stamp.cmp(&a.time_stamp));

        let pagination = Pagination {
            current_page: page,
            page_size,
            total_records: transactions.len() as u64,
            has_previous_page: page > 1,
            has_next_page: transactions.len() as u64 == page_size,
        };

        let result = HistoryPage {
            transactions,
            pagination,
        };
        self.cache.insert(
            CacheKey {
                address,
                page,
                page_size,
            },
            result.clone(),
        );

        tracing::info!(
            txs = result.transactions.len(),
            contracts = self.registry.len(),
            "history page ready"
        );
        Ok(result)
    }

    /// Creates or updates the registry record behind a token transfer.
    fn record_token_contract(&mut self, contract: Address, tx: &Transaction) {
        let record = self.registry.entry(contract, DiscoveryOrigin::TokenTransfer);
        if record.name.is_none() {
            record.name = tx.token_name.clone();
        }
        if record.symbol.is_none() {
            record.symbol = tx.token_symbol.clone();
        }
        if let Some(decimals) = tx.token_decimals {
            record.decimals = decimals;
        }
        record.push_related(TxRef::from_tx(tx));
    }

    /// Counts nonempty call inputs per recipient. At the threshold the
    /// address is logged as a likely contract and registered for a creator
    /// lookup -- but never classified as a token contract by this signal
    /// alone.
    fn note_call_input(&mut self, raw: &NativeTransfer) {
        if !has_call_input(&raw.input) {
            return;
        }
        let Some(to) = parse_address(&raw.to) else {
            return;
        };
        let sightings = self.registry.note_call(to);
        if sightings == CALL_HEURISTIC_THRESHOLD {
            tracing::info!(address = %to, sightings, "possibly a contract");
            self.registry.entry(to, DiscoveryOrigin::CallHeuristic);
        }
    }
}

fn has_call_input(input: &str) -> bool {
    !(input.is_empty() || input == "0x")
}

fn normalize_native(raw: &NativeTransfer, queried: Address) -> Transaction {
    let from = parse_address(&raw.from).unwrap_or(Address::ZERO);
    let value = parse_u256(&raw.value);
    Transaction {
        hash: parse_hash(&raw.hash),
        block_number: parse_u64(&raw.block_number),
        time_stamp: parse_u64(&raw.time_stamp),
        from,
        to: parse_address(&raw.to),
        contract_address: None,
        value,
        display_value: format_display_value(value, NATIVE_DECIMALS, NATIVE_SYMBOL),
        direction: Direction::relative_to(from, queried),
        kind: TxKind::Native,
        token_name: None,
        token_symbol: None,
        token_decimals: None,
    }
}

fn normalize_token(raw: &TokenTransfer, queried: Address) -> Transaction {
    let from = parse_address(&raw.from).unwrap_or(Address::ZERO);
    let value = parse_u256(&raw.value);
    let decimals = parse_decimals(&raw.token_decimal);
    let name = non_empty(&raw.token_name);
    let symbol = non_empty(&raw.token_symbol);
    let display_symbol = symbol.as_deref().unwrap_or(UNKNOWN_TOKEN_SYMBOL);

    Transaction {
        hash: parse_hash(&raw.hash),
        block_number: parse_u64(&raw.block_number),
        time_stamp: parse_u64(&raw.time_stamp),
        from,
        to: parse_address(&raw.to),
        contract_address: parse_address(&raw.contract_address),
        value,
        display_value: format_display_value(value, decimals, display_symbol),
        direction: Direction::relative_to(from, queried),
        kind: TxKind::Token,
        token_name: name,
        token_symbol: symbol,
        token_decimals: Some(decimals),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
