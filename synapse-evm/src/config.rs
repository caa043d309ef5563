//! Client configuration.
//!
//! SYNAPSE deployments are installation-specific, so contract addresses
//! always come from configuration — there is no built-in address book.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default receipt wait, in seconds.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 30;

/// A single RPC endpoint with an optional requests-per-second cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcEndpoint {
    /// HTTP(S) JSON-RPC URL.
    pub url: Url,
    /// Client-side requests-per-second limit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
}

impl RpcEndpoint {
    /// Endpoint with no client-side rate limit.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            rate_limit: None,
        }
    }
}

/// Deployed contract addresses for one SYNAPSE installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    /// SYNX token (ERC-20).
    pub token: Address,
    /// Payment router: direct payments, escrows, streams.
    pub payment_router: Address,
    /// Reputation registry: agents, ratings, disputes.
    pub reputation: Address,
    /// Service registry: listings, quotes, pricing.
    pub service_registry: Address,
    /// Payment channel hub.
    pub payment_channel: Address,
}

/// Connection configuration for [`SynapseClient`](crate::client::SynapseClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// RPC endpoints, with transport-level fallback between them.
    pub endpoints: Vec<RpcEndpoint>,
    /// Deployed contract addresses.
    pub contracts: ContractAddresses,
    /// Whether the chain prices gas via EIP-1559. Legacy gas pricing is used
    /// otherwise.
    #[serde(default = "default_eip1559")]
    pub eip1559: bool,
    /// Seconds to wait for a transaction receipt before giving up. The
    /// transaction may still confirm after the wait is abandoned.
    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_secs: u64,
}

impl ClientConfig {
    /// Configuration for a single endpoint, with defaults everywhere else.
    #[must_use]
    pub fn new(url: Url, contracts: ContractAddresses) -> Self {
        Self {
            endpoints: vec![RpcEndpoint::new(url)],
            contracts,
            eip1559: true,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
        }
    }
}

const fn default_eip1559() -> bool {
    true
}

const fn default_receipt_timeout() -> u64 {
    DEFAULT_RECEIPT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserializes_with_defaults() {
        let json = r#"{
            "endpoints": [{ "url": "https://rpc.example.com/" }],
            "contracts": {
                "token": "0x1111111111111111111111111111111111111111",
                "paymentRouter": "0x2222222222222222222222222222222222222222",
                "reputation": "0x3333333333333333333333333333333333333333",
                "serviceRegistry": "0x4444444444444444444444444444444444444444",
                "paymentChannel": "0x5555555555555555555555555555555555555555"
            }
        }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert!(config.eip1559);
        assert_eq!(config.receipt_timeout_secs, DEFAULT_RECEIPT_TIMEOUT_SECS);
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].rate_limit, None);
        assert_eq!(
            config.contracts.token,
            Address::repeat_byte(0x11)
        );
    }

    #[test]
    fn test_config_roundtrip() {
        let config = ClientConfig::new(
            "http://localhost:8545".parse().unwrap(),
            ContractAddresses {
                token: Address::repeat_byte(1),
                payment_router: Address::repeat_byte(2),
                reputation: Address::repeat_byte(3),
                service_registry: Address::repeat_byte(4),
                payment_channel: Address::repeat_byte(5),
            },
        );
        let json = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
