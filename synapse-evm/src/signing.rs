//! Off-chain channel state signing and verification.
//!
//! The channel contract verifies close signatures with `ecrecover` over the
//! EIP-191 personal-message digest of the packed state, so a signature here
//! is produced over `eip191_hash_message(state.digest())`. Any deviation in
//! the prefix or the digest yields a signature that is byte-valid but never
//! recovers to the signer on-chain — this module is the single place that
//! discipline lives.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, FixedBytes, Signature, eip191_hash_message};
use alloy_signer_local::PrivateKeySigner;
use synapse::channel::{ChannelState, NonceTracker, StaleNonceError};
use synapse::ident::ChannelId;

/// A trait that abstracts signing operations, allowing both owned signers
/// and `Arc`-wrapped signers.
///
/// Alloy's `Signer` trait is not implemented for `Arc<T>`, but callers often
/// share one key across tasks; this keeps both shapes usable.
pub trait SignerLike: Send + Sync {
    /// Returns the address of the signing key.
    fn address(&self) -> Address;

    /// Signs the given 32-byte digest.
    fn sign_hash(
        &self,
        hash: &FixedBytes<32>,
    ) -> impl Future<Output = Result<Signature, alloy_signer::Error>> + Send;
}

impl SignerLike for PrivateKeySigner {
    fn address(&self) -> Address {
        Self::address(self)
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

impl<T: SignerLike + Send + Sync> SignerLike for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        (**self).sign_hash(hash).await
    }
}

/// Errors from channel state signing and verification.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The state's nonce does not supersede one already signed.
    #[error(transparent)]
    StaleNonce(#[from] StaleNonceError),
    /// The underlying key failed to produce a signature.
    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),
    /// The signature bytes do not parse as a 65-byte ECDSA signature.
    #[error("malformed channel state signature")]
    MalformedSignature,
}

/// Signs successive channel states for one account, refusing downgrades.
///
/// The signer tracks the highest nonce it has signed per channel and will
/// not sign a state at or below it, so a counterparty holding an old state
/// can never obtain a fresh signature for it. Tracking is in-memory and
/// scoped to this value; persist the last-signed nonces externally if the
/// process may restart mid-channel.
#[derive(Debug)]
pub struct ChannelSigner<S> {
    signer: S,
    nonces: NonceTracker,
}

impl<S> ChannelSigner<S> {
    /// Creates a signer with no signing history.
    pub fn new(signer: S) -> Self {
        Self {
            signer,
            nonces: NonceTracker::new(),
        }
    }

    /// Highest nonce this signer has signed for `channel`, if any.
    #[must_use]
    pub fn last_signed_nonce(&self, channel: ChannelId) -> Option<u64> {
        self.nonces.last_signed(channel)
    }
}

impl<S: SignerLike> ChannelSigner<S> {
    /// Address of the underlying signing key.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signs `state`, producing the 65-byte signature the channel contract
    /// verifies at close.
    ///
    /// The nonce is recorded before the key is used, so a state at a nonce
    /// at or below any previously signed one is refused, and a failed
    /// signing attempt still consumes its nonce.
    ///
    /// # Errors
    ///
    /// [`SigningError::StaleNonce`] when the nonce does not supersede the
    /// highest already signed for the channel; [`SigningError::Signer`] when
    /// the key fails.
    pub async fn sign_state(&self, state: &ChannelState) -> Result<Bytes, SigningError> {
        self.nonces.record(state.channel_id, state.nonce)?;
        let digest = eip191_hash_message(state.digest());
        let signature = self.signer.sign_hash(&digest).await?;
        Ok(signature.as_bytes().into())
    }
}

/// Checks that `signature` over `state` was produced by `expected_signer`.
///
/// Recovery runs over the same EIP-191 prefixed digest
/// [`ChannelSigner::sign_state`] produces, so the two sides of an exchange
/// agree on the pre-image byte for byte.
///
/// # Errors
///
/// [`SigningError::MalformedSignature`] when the bytes are not a well-formed
/// 65-byte ECDSA signature.
pub fn verify_state(
    state: &ChannelState,
    signature: &[u8],
    expected_signer: Address,
) -> Result<bool, SigningError> {
    let signature =
        Signature::from_raw(signature).map_err(|_| SigningError::MalformedSignature)?;
    let digest = eip191_hash_message(state.digest());
    let recovered = signature
        .recover_address_from_prehash(&digest)
        .map_err(|_| SigningError::MalformedSignature)?;
    Ok(recovered == expected_signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use synapse::TokenAmount;

    fn state_for(channel: u8, nonce: u64) -> ChannelState {
        ChannelState::new(
            ChannelId::from([channel; 32]),
            TokenAmount::from_wire(U256::from(7_000_000_000_000_000_000_u128)),
            TokenAmount::from_wire(U256::from(3_000_000_000_000_000_000_u128)),
            nonce,
        )
    }

    #[tokio::test]
    async fn test_sign_then_verify() {
        let signer = ChannelSigner::new(PrivateKeySigner::random());
        let state = state_for(0x42, 1);
        let signature = signer.sign_state(&state).await.unwrap();
        assert!(verify_state(&state, &signature, signer.address()).unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_other_signer() {
        let signer = ChannelSigner::new(PrivateKeySigner::random());
        let state = state_for(0x42, 1);
        let signature = signer.sign_state(&state).await.unwrap();
        let other = PrivateKeySigner::random().address();
        assert!(!verify_state(&state, &signature, other).unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_tampered_state() {
        let signer = ChannelSigner::new(PrivateKeySigner::random());
        let state = state_for(0x42, 1);
        let signature = signer.sign_state(&state).await.unwrap();

        let mut shifted = state;
        shifted.balance1 = TokenAmount::from_wire(U256::from(1u64));
        assert!(!verify_state(&shifted, &signature, signer.address()).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let result = verify_state(&state_for(0x42, 1), &[0u8; 10], Address::ZERO);
        assert!(matches!(result, Err(SigningError::MalformedSignature)));
    }

    #[tokio::test]
    async fn test_refuses_superseded_nonces() {
        let signer = ChannelSigner::new(PrivateKeySigner::random());
        signer.sign_state(&state_for(0x42, 3)).await.unwrap();
        signer.sign_state(&state_for(0x42, 5)).await.unwrap();

        for stale in [5, 4, 3, 0] {
            assert!(
                matches!(
                    signer.sign_state(&state_for(0x42, stale)).await,
                    Err(SigningError::StaleNonce(_))
                ),
                "nonce {stale} should be refused after signing nonce 5"
            );
        }
        assert_eq!(signer.last_signed_nonce(ChannelId::from([0x42; 32])), Some(5));
        signer.sign_state(&state_for(0x42, 6)).await.unwrap();
    }

    #[tokio::test]
    async fn test_nonces_tracked_per_channel() {
        let signer = ChannelSigner::new(PrivateKeySigner::random());
        signer.sign_state(&state_for(0x01, 9)).await.unwrap();
        // A different channel starts its own sequence.
        signer.sign_state(&state_for(0x02, 1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_arc_wrapped_signer() {
        let signer = ChannelSigner::new(Arc::new(PrivateKeySigner::random()));
        let state = state_for(0x42, 1);
        let signature = signer.sign_state(&state).await.unwrap();
        assert!(verify_state(&state, &signature, signer.address()).unwrap());
    }
}
