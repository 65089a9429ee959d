//! HTTP client for the bscope backend proxy.

use crate::wire::{
    ApiEnvelope, ContractInfo, NativeTransfer, RuntimeConfig, TokenTransfer, VerificationStatus,
};
use crate::ChainSource;
use alloy_primitives::Address;
use async_trait::async_trait;
use bscope_core::error::{BscopeError, BscopeResult};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Per-request timeout. Transport policy only -- the crawler and ingestion
/// layers impose no deadline of their own.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks JSON-over-HTTP to the backend proxy (which in turn fronts the
/// BSCScan/Moralis APIs).
///
/// ```ignore
/// let client = BackendClient::new("http://localhost:3000")?;
/// let transfers = client.native_transfers(address, 1, 500).await?;
/// ```
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> BscopeResult<Self> {
        if base_url.is_empty() {
            return Err(BscopeError::InvalidInput(
                "backend URL must not be empty".into(),
            ));
        }

        let base = Url::parse(base_url)
            .map_err(|e| BscopeError::InvalidInput(format!("bad backend URL {base_url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BscopeError::Backend(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(base_url, "backend client ready");

        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> BscopeResult<Url> {
        self.base
            .join(path)
            .map_err(|e| BscopeError::Internal(format!("bad endpoint path {path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BscopeResult<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BscopeError::Backend(format!("GET {path} failed: {e}")))?
            .error_for_status()
            .map_err(|e| BscopeError::Backend(format!("GET {path} failed: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| BscopeError::Backend(format!("GET {path}: invalid response: {e}")))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> BscopeResult<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BscopeError::Backend(format!("POST {path} failed: {e}")))?
            .error_for_status()
            .map_err(|e| BscopeError::Backend(format!("POST {path} failed: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| BscopeError::Backend(format!("POST {path}: invalid response: {e}")))
    }
}

#[async_trait]
impl ChainSource for BackendClient {
    async fn runtime_config(&self) -> BscopeResult<RuntimeConfig> {
        self.get_json("/api/config").await
    }

    async fn native_transfers(
        &self,
        address: Address,
        page: u64,
        offset: u64,
    ) -> BscopeResult<Vec<NativeTransfer>> {
        tracing::debug!(%address, page, offset, "fetching native transfers");
        let envelope: ApiEnvelope<Vec<NativeTransfer>> = self
            .post_json(
                "/api/transactions",
                json!({ "address": address, "page": page, "offset": offset }),
            )
            .await?;
        tracing::debug!(count = envelope.result.len(), "native transfers fetched");
        Ok(envelope.result)
    }

    async fn token_transfers(
        &self,
        address: Address,
        page: u64,
        offset: u64,
    ) -> BscopeResult<Vec<TokenTransfer>> {
        tracing::debug!(%address, page, offset, "fetching token transfers");
        let envelope: ApiEnvelope<Vec<TokenTransfer>> = self
            .post_json(
                "/api/token-transfers",
                json!({ "address": address, "page": page, "offset": offset }),
            )
            .await?;
        tracing::debug!(count = envelope.result.len(), "token transfers fetched");
        Ok(envelope.result)
    }

    async fn contract_info(&self, contract: Address) -> BscopeResult<ContractInfo> {
        tracing::debug!(%contract, "fetching contract info");
        let envelope: ApiEnvelope<ContractInfo> = self
            .post_json("/api/contract-info", json!({ "contractAddress": contract }))
            .await?;
        Ok(envelope.result)
    }

    async fn verify_burn(&self, tx_hash: &str) -> BscopeResult<serde_json::Value> {
        tracing::debug!(tx_hash, "submitting burn verification");
        let envelope: ApiEnvelope<serde_json::Value> = self
            .post_json("/api/verify-burn", json!({ "txHash": tx_hash }))
            .await?;
        Ok(envelope.result)
    }

    async fn verification_status(&self) -> BscopeResult<VerificationStatus> {
        self.get_json("/api/verification-status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_rejected() {
        assert!(matches!(
            BackendClient::new(""),
            Err(BscopeError::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_url_rejected() {
        assert!(BackendClient::new("not a url").is_err());
    }

    #[test]
    fn endpoint_joins_absolute_paths() {
        let client = BackendClient::new("http://localhost:3000/viewer/").unwrap();
        let url = client.endpoint("/api/config").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/config");
    }
}
