//! Error types for SYNAPSE client operations.

use alloy_primitives::TxHash;
use alloy_provider::{PendingTransactionError, WatchTxError};
use alloy_transport::TransportError;
use synapse::amount::AmountError;

use crate::provider::NoEndpointsError;
use crate::signing::SigningError;

/// Errors surfaced by [`SynapseClient`](crate::client::SynapseClient)
/// operations.
///
/// Validation variants (`RatingOutOfRange`, `EmptyBatch`,
/// `InvalidStreamWindow`, `Amount`) are raised before anything touches the
/// network. Transport and timeout failures are surfaced, never retried:
/// under an ambiguous account nonce a blind retry risks double submission.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A rating outside the contract's accepted range.
    #[error("rating {0} outside the accepted range 1..=5")]
    RatingOutOfRange(u8),
    /// A batch payment with no entries.
    #[error("batch payment contains no entries")]
    EmptyBatch,
    /// A stream whose end does not come after its start.
    #[error("stream end time {end_time} does not follow start time {start_time}")]
    InvalidStreamWindow {
        /// Requested stream start (unix seconds).
        start_time: u64,
        /// Requested stream end (unix seconds).
        end_time: u64,
    },
    /// Malformed, negative, or over-precise token amount.
    #[error(transparent)]
    Amount(#[from] AmountError),
    /// A write was attempted on a client constructed without a signing key.
    #[error("no signing key configured; writes require connect_with_signer")]
    NoSigner,
    /// Channel state signing or verification failed.
    #[error(transparent)]
    Signing(#[from] SigningError),
    /// No usable RPC endpoint in the configuration.
    #[error(transparent)]
    NoEndpoints(#[from] NoEndpointsError),
    /// The transaction was mined but its receipt reports failure.
    #[error("transaction {0} reverted")]
    TransactionReverted(TxHash),
    /// The confirmation wait hit its deadline. The transaction may still be
    /// mined afterwards — re-check with `wait_for_transaction` before even
    /// considering a resubmission.
    #[error("timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(TxHash),
    /// RPC transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Pending transaction error other than a timeout.
    #[error(transparent)]
    PendingTransaction(PendingTransactionError),
    /// Contract call failed.
    #[error("contract call failed: {0}")]
    ContractCall(String),
    /// An on-chain response did not decode into the expected shape.
    #[error("malformed on-chain response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Maps a receipt-wait failure, splitting the timeout case out so
    /// callers can distinguish "gave up waiting" from "failed".
    pub(crate) fn from_pending(tx_hash: TxHash, error: PendingTransactionError) -> Self {
        match error {
            PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
                Self::ConfirmationTimeout(tx_hash)
            }
            other => Self::PendingTransaction(other),
        }
    }
}

impl From<alloy_contract::Error> for ClientError {
    fn from(error: alloy_contract::Error) -> Self {
        match error {
            alloy_contract::Error::UnknownFunction(_)
            | alloy_contract::Error::UnknownSelector(_)
            | alloy_contract::Error::NotADeploymentTransaction
            | alloy_contract::Error::ContractNotDeployed
            | alloy_contract::Error::ZeroData(_, _)
            | alloy_contract::Error::AbiError(_) => Self::ContractCall(error.to_string()),
            alloy_contract::Error::TransportError(e) => Self::Transport(e),
            alloy_contract::Error::PendingTransactionError(e) => Self::PendingTransaction(e),
        }
    }
}
