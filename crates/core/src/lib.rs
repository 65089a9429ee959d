//! Domain models, display formatting, and error definitions.
//!
//! Foundation crate -- no async or I/O dependencies.

pub mod error;
pub mod types;
pub mod units;

pub use error::BscopeError;
pub use types::{
    ContractRecord, CrawlProgress, Direction, DiscoveryOrigin, HistoryPage, Pagination,
    Transaction, TxKind, TxRef,
};
