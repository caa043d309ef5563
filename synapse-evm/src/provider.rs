//! RPC transport and provider stack construction.
//!
//! The client talks to one or more HTTP JSON-RPC endpoints through a single
//! [`RpcClient`]: each endpoint gets a client-side throttle, and a fallback
//! layer rotates away from endpoints that error. Writing clients wrap that
//! transport in the standard filler stack (gas, blob gas, nonce, chain id)
//! plus wallet signing; read-only clients use a bare [`RootProvider`].
//!
//! Nonce assignment is per-provider and not synchronized across instances:
//! two clients writing with the same key race on the account nonce, and one
//! of the submissions will be rejected. Callers that need concurrent writes
//! must give each logical writer its own key.

use std::num::NonZeroUsize;

use alloy_network::EthereumWallet;
use alloy_provider::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
    SimpleNonceManager, WalletFiller,
};
use alloy_provider::{Identity, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use tower::ServiceBuilder;

use crate::config::RpcEndpoint;

/// Combined filler type for gas, blob gas, nonce, and chain ID.
pub type SynapseFiller = JoinFill<
    GasFiller,
    JoinFill<BlobGasFiller, JoinFill<NonceFiller<SimpleNonceManager>, ChainIdFiller>>,
>;

/// Provider type used by writing clients: the filler stack plus wallet
/// signing over a [`RootProvider`].
pub type WriteProvider = FillProvider<
    JoinFill<JoinFill<Identity, SynapseFiller>, WalletFiller<EthereumWallet>>,
    RootProvider,
>;

/// Provider type used by read-only clients.
pub type ReadProvider = RootProvider;

/// The configuration listed no usable HTTP(S) endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no usable http(s) RPC endpoint configured")]
pub struct NoEndpointsError;

/// Creates an RPC client over the configured endpoints.
///
/// Each endpoint gets a [`ThrottleLayer`] honouring its optional rate limit;
/// non-HTTP(S) URLs are skipped. The surviving transports sit behind a
/// [`FallbackLayer`] so a failing endpoint is rotated out instead of failing
/// every call.
///
/// # Errors
///
/// Fails when no HTTP(S) endpoint remains after filtering.
pub fn rpc_client(endpoints: &[RpcEndpoint]) -> Result<RpcClient, NoEndpointsError> {
    let transports = endpoints
        .iter()
        .filter_map(|endpoint| {
            let scheme = endpoint.url.scheme();
            let is_http = scheme == "http" || scheme == "https";
            if !is_http {
                return None;
            }
            #[cfg(feature = "telemetry")]
            tracing::info!(rpc_url = %endpoint.url, rate_limit = ?endpoint.rate_limit, "Using HTTP transport");
            let limit = endpoint.rate_limit.unwrap_or(u32::MAX);
            let service = ServiceBuilder::new()
                .layer(ThrottleLayer::new(limit))
                .service(Http::new(endpoint.url.clone()));
            Some(service)
        })
        .collect::<Vec<_>>();
    let active = NonZeroUsize::new(transports.len()).ok_or(NoEndpointsError)?;
    let fallback = ServiceBuilder::new()
        .layer(FallbackLayer::default().with_active_transport_count(active))
        .service(transports);
    Ok(RpcClient::new(fallback, false))
}

/// Builds the write provider stack for `wallet` over the configured
/// endpoints.
///
/// # Errors
///
/// Fails when no HTTP(S) endpoint is configured.
pub fn write_provider(
    endpoints: &[RpcEndpoint],
    wallet: EthereumWallet,
) -> Result<WriteProvider, NoEndpointsError> {
    let client = rpc_client(endpoints)?;
    let filler = JoinFill::new(
        GasFiller,
        JoinFill::new(
            BlobGasFiller::default(),
            JoinFill::new(
                NonceFiller::new(SimpleNonceManager::default()),
                ChainIdFiller::default(),
            ),
        ),
    );
    Ok(ProviderBuilder::default()
        .filler(filler)
        .wallet(wallet)
        .connect_client(client))
}

/// Builds a read-only provider over the configured endpoints.
///
/// # Errors
///
/// Fails when no HTTP(S) endpoint is configured.
pub fn read_provider(endpoints: &[RpcEndpoint]) -> Result<ReadProvider, NoEndpointsError> {
    Ok(RootProvider::new(rpc_client(endpoints)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_endpoint_list() {
        assert!(rpc_client(&[]).is_err());
    }

    #[test]
    fn test_skips_non_http_endpoints() {
        let endpoints = [RpcEndpoint::new("ws://localhost:8546".parse().unwrap())];
        assert!(rpc_client(&endpoints).is_err());
    }

    #[test]
    fn test_accepts_http_endpoints() {
        let endpoints = [
            RpcEndpoint::new("http://localhost:8545".parse().unwrap()),
            RpcEndpoint {
                url: "https://rpc.example.com/".parse().unwrap(),
                rate_limit: Some(25),
            },
        ];
        assert!(rpc_client(&endpoints).is_ok());
    }
}
