//! JSON shapes consumed from the backend proxy.
//!
//! Every field is permissive: the upstream explorers string-encode numbers
//! and omit fields freely, so structs default anything absent and the parse
//! helpers substitute zero values for anything malformed.

use alloy_primitives::{Address, B256, U256};
use bscope_core::units::NATIVE_DECIMALS;
use serde::Deserialize;

/// `{ "result": ... }` wrapper used by the transaction and contract
/// endpoints. A missing `result` decodes to the payload's default.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T: Default> {
    #[serde(default)]
    pub result: T,
}

/// One native-currency transfer as returned by `POST /api/transactions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeTransfer {
    pub hash: String,
    pub block_number: String,
    pub time_stamp: String,
    pub from: String,
    pub to: String,
    pub value: String,
    /// Call data; `""` or `"0x"` for plain transfers.
    pub input: String,
}

/// One token transfer as returned by `POST /api/token-transfers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub hash: String,
    pub block_number: String,
    pub time_stamp: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub contract_address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimal: String,
}

/// `POST /api/contract-info` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractInfo {
    pub abi: String,
    pub source_code: String,
    pub creator: Vec<CreatorEntry>,
    pub bytecode_size: u64,
    pub balance: String,
    pub total_supply: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorEntry {
    pub contract_creator: String,
    pub tx_hash: String,
}

impl ContractInfo {
    /// First creator entry that parses to a nonzero address.
    ///
    /// Upstream uses placeholder strings (`"GENESIS"`, empty) and the zero
    /// address as "no creator known"; all of those resolve to `None`.
    pub fn resolved_creator(&self) -> Option<Address> {
        self.creator
            .iter()
            .filter_map(|entry| parse_address(&entry.contract_creator))
            .find(|address| !address.is_zero())
    }
}

/// `GET /api/config` payload. Fields beyond the concurrency limit are the
/// backend's own concern and are ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    pub bsc_scan: BscScanConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BscScanConfig {
    pub max_concurrent: usize,
}

impl Default for BscScanConfig {
    fn default() -> Self {
        Self { max_concurrent: 3 }
    }
}

/// `GET /api/verification-status` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationStatus {
    pub verified: bool,
    pub tx_hash: String,
    pub from: String,
}

// ---------------------------------------------------------------------------
// Parse helpers
// ---------------------------------------------------------------------------

/// Permissive hex-address parse; `None` for empty or malformed input.
pub fn parse_address(s: &str) -> Option<Address> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Hash parse with a zero fallback.
pub fn parse_hash(s: &str) -> B256 {
    s.trim().parse().unwrap_or(B256::ZERO)
}

/// Decimal-string integer with a zero fallback.
pub fn parse_u64(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

/// Decimal-string amount with a zero fallback.
pub fn parse_u256(s: &str) -> U256 {
    U256::from_str_radix(s.trim(), 10).unwrap_or(U256::ZERO)
}

/// Token decimal count, defaulting to the native 18.
pub fn parse_decimals(s: &str) -> u8 {
    s.trim().parse().unwrap_or(NATIVE_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_transfer_decodes_camel_case() {
        let raw = r#"{
            "hash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "blockNumber": "1024",
            "timeStamp": "1700000000",
            "from": "0x000000000000000000000000000000000000aaaa",
            "to": "0x000000000000000000000000000000000000bbbb",
            "value": "500000",
            "contractAddress": "0x000000000000000000000000000000000000cccc",
            "tokenName": "Tether USD",
            "tokenSymbol": "USDT",
            "tokenDecimal": "6"
        }"#;
        let transfer: TokenTransfer = serde_json::from_str(raw).unwrap();
        assert_eq!(transfer.token_symbol, "USDT");
        assert_eq!(parse_u64(&transfer.block_number), 1024);
        assert_eq!(parse_decimals(&transfer.token_decimal), 6);
    }

    #[test]
    fn missing_fields_default() {
        let transfer: NativeTransfer = serde_json::from_str(r#"{"hash": "0xdead"}"#).unwrap();
        assert!(transfer.value.is_empty());
        assert_eq!(parse_u256(&transfer.value), U256::ZERO);
        assert_eq!(parse_hash(&transfer.hash), B256::ZERO); // too short to parse
    }

    #[test]
    fn envelope_default_on_missing_result() {
        let envelope: ApiEnvelope<Vec<NativeTransfer>> = serde_json::from_str("{}").unwrap();
        assert!(envelope.result.is_empty());
    }

    #[test]
    fn resolved_creator_skips_sentinels() {
        let info = ContractInfo {
            creator: vec![
                CreatorEntry {
                    contract_creator: "GENESIS".into(),
                    tx_hash: String::new(),
                },
                CreatorEntry {
                    contract_creator: "0x0000000000000000000000000000000000000000".into(),
                    tx_hash: String::new(),
                },
                CreatorEntry {
                    contract_creator: "0x000000000000000000000000000000000000dddd".into(),
                    tx_hash: String::new(),
                },
            ],
            ..ContractInfo::default()
        };
        let creator = info.resolved_creator().unwrap();
        assert_eq!(
            creator,
            "0x000000000000000000000000000000000000dddd"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn no_creator_entries_is_unresolved() {
        assert!(ContractInfo::default().resolved_creator().is_none());
    }

    #[test]
    fn config_defaults_concurrency() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.bsc_scan.max_concurrent, 3);
    }
}
