//! Domain types for the bscope address-activity explorer.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Transfer direction relative to the queried address.
///
/// `from == queried` means `Out`, everything else is `In`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    #[inline]
    pub fn relative_to(from: Address, queried: Address) -> Self {
        if from == queried {
            Direction::Out
        } else {
            Direction::In
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// Native-currency transfer or fungible-token transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Native,
    Token,
}

/// Normalized transaction, annotated relative to the queried address.
///
/// Raw upstream strings are parsed once at ingestion; anything malformed
/// falls back to the zero value of its type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: B256,
    pub block_number: u64,
    /// Unix seconds. Upstream string-encodes this; sort key for merged pages.
    pub time_stamp: u64,
    pub from: Address,
    pub to: Option<Address>,
    /// Present only for token transfers.
    pub contract_address: Option<Address>,
    pub value: U256,
    /// Human string: fixed 6-decimal amount plus unit symbol.
    pub display_value: String,
    pub direction: Direction,
    pub kind: TxKind,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub token_decimals: Option<u8>,
}

impl Transaction {
    /// True if `address` appears as sender, recipient, or token contract.
    pub fn touches(&self, address: Address) -> bool {
        self.from == address || self.to == Some(address) || self.contract_address == Some(address)
    }
}

/// Lightweight reference kept on a [`ContractRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxRef {
    pub hash: B256,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
}

impl TxRef {
    pub fn from_tx(tx: &Transaction) -> Self {
        Self {
            hash: tx.hash,
            token_name: tx.token_name.clone(),
            token_symbol: tx.token_symbol.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Contract registry
// ---------------------------------------------------------------------------

/// How a contract entered the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryOrigin {
    TokenTransfer,
    CallHeuristic,
}

impl DiscoveryOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryOrigin::TokenTransfer => "from token transfer",
            DiscoveryOrigin::CallHeuristic => "from contract-call heuristic",
        }
    }
}

/// Token metadata discovered for one contract address.
///
/// `related` never holds two entries with the same hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRecord {
    pub address: Address,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: u8,
    pub creator: Option<Address>,
    pub created_by_queried: bool,
    pub related: SmallVec<[TxRef; 4]>,
    pub origin: DiscoveryOrigin,
}

impl ContractRecord {
    pub fn new(address: Address, origin: DiscoveryOrigin) -> Self {
        Self {
            address,
            name: None,
            symbol: None,
            decimals: crate::units::NATIVE_DECIMALS,
            creator: None,
            created_by_queried: false,
            related: SmallVec::new(),
            origin,
        }
    }

    /// Appends a reference, deduplicated by hash.
    pub fn push_related(&mut self, tx_ref: TxRef) {
        if self.related.iter().any(|r| r.hash == tx_ref.hash) {
            return;
        }
        self.related.push(tx_ref);
    }
}

// ---------------------------------------------------------------------------
// History pages
// ---------------------------------------------------------------------------

/// Pagination metadata for one ingested page.
///
/// `has_next_page` is a heuristic: a full page suggests more records
/// upstream. It is wrong exactly when the true total lands on a page-size
/// boundary; the backend exposes no total-count signal to do better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    pub page_size: u64,
    pub total_records: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// Merged native + token activity for one `(address, page, page_size)` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}

// ---------------------------------------------------------------------------
// Crawl progress
// ---------------------------------------------------------------------------

/// Point-in-time snapshot of a creator crawl.
///
/// `total` is fixed for a run's duration; `completed` and `with_creator`
/// only grow while `is_querying` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlProgress {
    pub is_querying: bool,
    pub total: u64,
    pub completed: u64,
    pub with_creator: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_word(B256::from(U256::from(n)))
    }

    #[test]
    fn direction_out_when_from_matches() {
        let a = addr(1);
        assert_eq!(Direction::relative_to(a, a), Direction::Out);
        assert_eq!(Direction::relative_to(addr(2), a), Direction::In);
    }

    #[test]
    fn record_defaults() {
        let record = ContractRecord::new(addr(7), DiscoveryOrigin::TokenTransfer);
        assert_eq!(record.decimals, 18);
        assert!(record.creator.is_none());
        assert!(!record.created_by_queried);
        assert!(record.related.is_empty());
        assert_eq!(record.origin.as_str(), "from token transfer");
    }

    #[test]
    fn push_related_dedups_by_hash() {
        let mut record = ContractRecord::new(addr(7), DiscoveryOrigin::TokenTransfer);
        let hash = B256::from(U256::from(42));
        record.push_related(TxRef {
            hash,
            token_name: None,
            token_symbol: None,
        });
        record.push_related(TxRef {
            hash,
            token_name: Some("Dup".into()),
            token_symbol: None,
        });
        assert_eq!(record.related.len(), 1);
    }
}
