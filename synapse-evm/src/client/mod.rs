//! Typed façade over the SYNAPSE contract suite.
//!
//! One [`SynapseClient`] covers all five contracts; the operations live in
//! one submodule per contract (token, payments, reputation, services,
//! channels) and share the uniform write flow implemented here: validate
//! inputs, build calldata, submit, wait for the receipt, and map a
//! non-success status to an error carrying the transaction hash.

mod channels;
mod payments;
mod reputation;
mod services;
mod token;

pub use channels::{ChannelInfo, ChannelOpenResult};
pub use payments::{BatchPayment, EscrowResult, PaymentResult, PaymentStats, StreamResult};
pub use reputation::{AgentInfo, ServiceRating};
pub use services::{ServiceInfo, ServiceRegistration};

use std::time::Duration;

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{PendingTransactionBuilder, Provider};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};
#[cfg(feature = "telemetry")]
use tracing_core::Level;

use crate::config::{ClientConfig, ContractAddresses};
use crate::error::ClientError;
use crate::provider::{ReadProvider, WriteProvider, read_provider, write_provider};

/// Client for one SYNAPSE deployment.
///
/// Generic over the underlying alloy provider: [`SynapseClient::connect`]
/// yields a read-only client over a bare [`ReadProvider`], and
/// [`SynapseClient::connect_with_signer`] a writing client whose provider
/// signs with the supplied key. The client holds nothing but immutable
/// configuration — every read refetches from the contracts, and every write
/// is a submission followed by a receipt wait, never a cache update.
///
/// # Example
///
/// ```rust,no_run
/// use synapse_evm::{ClientConfig, SynapseClient};
///
/// # async fn run(config: ClientConfig) -> Result<(), synapse_evm::ClientError> {
/// let signer = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
///     .parse()
///     .unwrap();
/// let client = SynapseClient::connect_with_signer(config, signer)?;
/// let recipient = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
/// let result = client.pay(recipient, "10.5".parse()?, None, None).await?;
/// println!("paid under id {}", result.payment_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SynapseClient<P> {
    provider: P,
    config: ClientConfig,
    signer_address: Option<Address>,
}

impl SynapseClient<ReadProvider> {
    /// Connects a read-only client. Write operations fail with
    /// [`ClientError::NoSigner`].
    ///
    /// # Errors
    ///
    /// Fails when the configuration lists no usable HTTP endpoint. No
    /// network traffic happens until the first operation.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let provider = read_provider(&config.endpoints)?;
        Ok(Self {
            provider,
            config,
            signer_address: None,
        })
    }
}

impl SynapseClient<WriteProvider> {
    /// Connects a client that signs transactions with `signer`.
    ///
    /// # Errors
    ///
    /// Fails when the configuration lists no usable HTTP endpoint.
    pub fn connect_with_signer(
        config: ClientConfig,
        signer: PrivateKeySigner,
    ) -> Result<Self, ClientError> {
        let signer_address = signer.address();
        let provider = write_provider(&config.endpoints, EthereumWallet::from(signer))?;
        Ok(Self {
            provider,
            config,
            signer_address: Some(signer_address),
        })
    }
}

/// Snapshot of basic chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Latest block number.
    pub block_number: u64,
    /// Current gas price in wei.
    pub gas_price: u128,
}

impl<P: Provider> SynapseClient<P> {
    /// Address of the configured signing account, if any.
    #[must_use]
    pub const fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    /// Deployed contract addresses this client talks to.
    #[must_use]
    pub const fn contracts(&self) -> &ContractAddresses {
        &self.config.contracts
    }

    /// Chain id, latest block number, and current gas price.
    pub async fn network_info(&self) -> Result<NetworkInfo, ClientError> {
        let chain_id = self.provider.get_chain_id().await?;
        let block_number = self.provider.get_block_number().await?;
        let gas_price = self.provider.get_gas_price().await?;
        Ok(NetworkInfo {
            chain_id,
            block_number,
            gas_price,
        })
    }

    /// Waits for `tx_hash` to confirm, up to `timeout`.
    ///
    /// A timeout here does not mean the transaction failed — it may still be
    /// mined afterwards. Call again rather than resubmitting.
    ///
    /// # Errors
    ///
    /// [`ClientError::ConfirmationTimeout`] when `timeout` elapses first.
    pub async fn wait_for_transaction(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<TransactionReceipt, ClientError> {
        PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_timeout(Some(timeout))
            .get_receipt()
            .await
            .map_err(|e| ClientError::from_pending(tx_hash, e))
    }

    /// Signer address, or the error every write starts with when absent.
    fn require_signer(&self) -> Result<Address, ClientError> {
        self.signer_address.ok_or(ClientError::NoSigner)
    }

    /// Submits `calldata` to `to` and waits for the receipt.
    ///
    /// Legacy chains get an explicit gas price; gas is estimated against the
    /// pending block. Nothing is retried on failure.
    async fn send_call(&self, to: Address, calldata: Bytes) -> Result<TransactionReceipt, ClientError> {
        let from = self.require_signer()?;
        let mut tx = TransactionRequest::default()
            .with_to(to)
            .with_from(from)
            .with_input(calldata);

        if !self.config.eip1559 {
            let gas_price = self.provider.get_gas_price().await?;
            tx.set_gas_price(gas_price);
        }
        let gas_limit = self
            .provider
            .estimate_gas(tx.clone())
            .block(BlockId::pending())
            .await?;
        tx.set_gas_limit(gas_limit);

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        let timeout = Duration::from_secs(self.config.receipt_timeout_secs);
        let receipt = pending
            .with_timeout(Some(timeout))
            .get_receipt()
            .await
            .map_err(|e| ClientError::from_pending(tx_hash, e))?;
        #[cfg(feature = "telemetry")]
        tracing::event!(
            Level::DEBUG,
            tx = %receipt.transaction_hash,
            status = receipt.status(),
            "transaction mined"
        );
        Ok(receipt)
    }

    /// Maps a mined receipt to its hash, or the reverted error.
    fn ensure_success(receipt: &TransactionReceipt) -> Result<TxHash, ClientError> {
        if receipt.status() {
            Ok(receipt.transaction_hash)
        } else {
            #[cfg(feature = "telemetry")]
            tracing::event!(
                Level::WARN,
                tx = %receipt.transaction_hash,
                "transaction reverted"
            );
            Err(ClientError::TransactionReverted(receipt.transaction_hash))
        }
    }

    /// First `E` event among the receipt's logs emitted by `emitter`.
    fn decode_event<E: SolEvent>(receipt: &TransactionReceipt, emitter: Address) -> Option<E> {
        receipt
            .logs()
            .iter()
            .filter(|log| log.address() == emitter)
            .find_map(|log| log.log_decode::<E>().ok().map(|decoded| decoded.inner.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use synapse::TokenAmount;
    use synapse::ident::ServiceId;

    fn test_config() -> ClientConfig {
        // Nothing listens here; these tests must fail before any I/O.
        ClientConfig::new(
            "http://localhost:8545".parse().unwrap(),
            ContractAddresses {
                token: Address::repeat_byte(1),
                payment_router: Address::repeat_byte(2),
                reputation: Address::repeat_byte(3),
                service_registry: Address::repeat_byte(4),
                payment_channel: Address::repeat_byte(5),
            },
        )
    }

    fn read_only() -> SynapseClient<ReadProvider> {
        SynapseClient::connect(test_config()).unwrap()
    }

    #[test]
    fn test_connect_read_only_has_no_signer() {
        assert_eq!(read_only().signer_address(), None);
    }

    #[test]
    fn test_connect_with_signer_exposes_address() {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        let client = SynapseClient::connect_with_signer(test_config(), signer).unwrap();
        assert_eq!(client.signer_address(), Some(address));
    }

    #[tokio::test]
    async fn test_rating_out_of_range_fails_before_network() {
        let client = read_only();
        for rating in [0u8, 6, 200] {
            let result = client
                .rate_service(Address::repeat_byte(9), "language_model", rating)
                .await;
            assert!(
                matches!(result, Err(ClientError::RatingOutOfRange(r)) if r == rating),
                "rating {rating} should be rejected locally"
            );
        }
    }

    #[tokio::test]
    async fn test_empty_batch_fails_before_network() {
        let result = read_only().batch_pay(&[]).await;
        assert!(matches!(result, Err(ClientError::EmptyBatch)));
    }

    #[tokio::test]
    async fn test_inverted_stream_window_fails_before_network() {
        let amount = TokenAmount::from_wire(U256::from(1u64));
        let result = read_only()
            .create_stream(Address::repeat_byte(9), amount, 200, 100)
            .await;
        assert!(matches!(
            result,
            Err(ClientError::InvalidStreamWindow {
                start_time: 200,
                end_time: 100,
            })
        ));
    }

    #[tokio::test]
    async fn test_writes_require_signer() {
        let client = read_only();
        let amount = TokenAmount::from_wire(U256::from(1u64));
        let to = Address::repeat_byte(9);

        assert!(matches!(
            client.transfer(to, amount).await,
            Err(ClientError::NoSigner)
        ));
        assert!(matches!(
            client.pay(to, amount, None, None).await,
            Err(ClientError::NoSigner)
        ));
        assert!(matches!(
            client.release_escrow(synapse::EscrowId::from([7; 32])).await,
            Err(ClientError::NoSigner)
        ));
        assert!(matches!(
            client.accept_quote(synapse::QuoteId::from([7; 32])).await,
            Err(ClientError::NoSigner)
        ));
        assert!(matches!(
            client
                .update_service_price(ServiceId::from([7; 32]), amount)
                .await,
            Err(ClientError::NoSigner)
        ));
    }
}
