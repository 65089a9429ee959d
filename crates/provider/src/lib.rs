//! Data provider abstraction and backend HTTP client for bscope.

pub mod backend;
pub mod wire;

use alloy_primitives::Address;
use async_trait::async_trait;
use bscope_core::error::BscopeResult;
use wire::{ContractInfo, NativeTransfer, RuntimeConfig, TokenTransfer, VerificationStatus};

pub use backend::BackendClient;

/// Abstraction over the backend proxy, one method per endpoint.
///
/// Implemented by [`BackendClient`] for production and by in-memory fakes in
/// tests; the ingestion and crawler layers only ever see this trait.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// `GET /api/config` -- runtime knobs, notably the crawl concurrency.
    async fn runtime_config(&self) -> BscopeResult<RuntimeConfig>;

    /// `POST /api/transactions` -- native-currency transfers for `address`.
    async fn native_transfers(
        &self,
        address: Address,
        page: u64,
        offset: u64,
    ) -> BscopeResult<Vec<NativeTransfer>>;

    /// `POST /api/token-transfers` -- token transfers for `address`.
    async fn token_transfers(
        &self,
        address: Address,
        page: u64,
        offset: u64,
    ) -> BscopeResult<Vec<TokenTransfer>>;

    /// `POST /api/contract-info` -- metadata and creator for one contract.
    async fn contract_info(&self, contract: Address) -> BscopeResult<ContractInfo>;

    /// `POST /api/verify-burn` -- submit a burn transaction for verification.
    async fn verify_burn(&self, tx_hash: &str) -> BscopeResult<serde_json::Value>;

    /// `GET /api/verification-status` -- the backend's current verification.
    async fn verification_status(&self) -> BscopeResult<VerificationStatus>;
}
