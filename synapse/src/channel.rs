//! Off-chain payment channel state.
//!
//! A channel holds two balances and a nonce. Participants exchange signed
//! states off-chain; at close, the contract honours whichever mutually
//! signed state carries the highest nonce. [`ChannelState::encode`] is the
//! exact pre-image the contract rebuilds to verify those signatures, and
//! [`NonceTracker`] is the caller-side guard that keeps a signer from ever
//! re-signing a superseded balance split.

use alloy_primitives::{B256, U256, keccak256};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::ident::ChannelId;

/// A single off-chain state of a bidirectional payment channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Channel this state belongs to.
    pub channel_id: ChannelId,
    /// Balance of the first participant.
    pub balance1: TokenAmount,
    /// Balance of the second participant.
    pub balance2: TokenAmount,
    /// Monotonic state counter; a higher nonce supersedes a lower one.
    pub nonce: u64,
}

impl ChannelState {
    /// Length in bytes of the packed signing pre-image.
    pub const ENCODED_LEN: usize = 128;

    /// Creates a state for `channel_id`.
    #[must_use]
    pub const fn new(
        channel_id: ChannelId,
        balance1: TokenAmount,
        balance2: TokenAmount,
        nonce: u64,
    ) -> Self {
        Self {
            channel_id,
            balance1,
            balance2,
            nonce,
        }
    }

    /// Packs the state as `(bytes32, uint256, uint256, uint256)` — tight
    /// big-endian concatenation, no padding between fields.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..32].copy_from_slice(self.channel_id.as_bytes());
        out[32..64].copy_from_slice(&self.balance1.wire().to_be_bytes::<32>());
        out[64..96].copy_from_slice(&self.balance2.wire().to_be_bytes::<32>());
        out[96..].copy_from_slice(&U256::from(self.nonce).to_be_bytes::<32>());
        out
    }

    /// Keccak digest of [`Self::encode`] — the value both parties sign.
    #[must_use]
    pub fn digest(&self) -> B256 {
        keccak256(self.encode())
    }
}

/// Tracks the highest nonce signed per channel.
///
/// Once a state at nonce `n` has been recorded for a channel, any state at a
/// nonce `<= n` is refused, so a counterparty can never coax a replacement
/// signature for a balance split that has already been superseded. One
/// tracker guards one signing key; it is safe to share across threads.
#[derive(Debug, Default)]
pub struct NonceTracker {
    last_signed: DashMap<ChannelId, u64>,
}

impl NonceTracker {
    /// Creates a tracker with no signing history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `nonce` as signed for `channel`.
    ///
    /// # Errors
    ///
    /// Fails when `nonce` does not exceed the highest nonce already recorded
    /// for the channel. The check and the update are one atomic step.
    pub fn record(&self, channel: ChannelId, nonce: u64) -> Result<(), StaleNonceError> {
        match self.last_signed.entry(channel) {
            Entry::Occupied(mut entry) => {
                let last_signed = *entry.get();
                if nonce <= last_signed {
                    return Err(StaleNonceError {
                        channel,
                        nonce,
                        last_signed,
                    });
                }
                entry.insert(nonce);
                Ok(())
            }
            Entry::Vacant(entry) => {
                entry.insert(nonce);
                Ok(())
            }
        }
    }

    /// Highest nonce recorded for `channel`, if any.
    #[must_use]
    pub fn last_signed(&self, channel: ChannelId) -> Option<u64> {
        self.last_signed.get(&channel).map(|nonce| *nonce)
    }
}

/// A channel state carried a nonce at or below one already signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "nonce {nonce} for channel {channel} does not supersede already-signed nonce {last_signed}"
)]
pub struct StaleNonceError {
    /// Channel the refused state belonged to.
    pub channel: ChannelId,
    /// Nonce of the refused state.
    pub nonce: u64,
    /// Highest nonce previously signed for the channel.
    pub last_signed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(byte: u8) -> ChannelId {
        ChannelId::from([byte; 32])
    }

    fn state(nonce: u64) -> ChannelState {
        ChannelState::new(
            channel(0x42),
            TokenAmount::from_wire(U256::from(7_000_000_000_000_000_000_u128)),
            TokenAmount::from_wire(U256::from(3_000_000_000_000_000_000_u128)),
            nonce,
        )
    }

    #[test]
    fn test_encode_layout() {
        let st = state(5);
        let encoded = st.encode();
        assert_eq!(&encoded[..32], st.channel_id.as_bytes());
        assert_eq!(&encoded[32..64], &st.balance1.wire().to_be_bytes::<32>());
        assert_eq!(&encoded[64..96], &st.balance2.wire().to_be_bytes::<32>());
        // The nonce occupies the low-order bytes of the final uint256 word.
        assert_eq!(&encoded[96..120], &[0u8; 24]);
        assert_eq!(&encoded[120..], &5u64.to_be_bytes());
    }

    #[test]
    fn test_digest_is_deterministic_and_field_sensitive() {
        assert_eq!(state(5).digest(), state(5).digest());
        assert_ne!(state(5).digest(), state(6).digest());

        let mut other = state(5);
        other.balance1 = TokenAmount::from_wire(U256::from(1u64));
        assert_ne!(state(5).digest(), other.digest());
    }

    #[test]
    fn test_tracker_requires_strictly_increasing_nonces() {
        let tracker = NonceTracker::new();
        tracker.record(channel(1), 3).unwrap();
        tracker.record(channel(1), 5).unwrap();

        let err = tracker.record(channel(1), 5).unwrap_err();
        assert_eq!(err.last_signed, 5);
        assert!(tracker.record(channel(1), 4).is_err());
        assert!(tracker.record(channel(1), 6).is_ok());
    }

    #[test]
    fn test_tracker_allows_nonce_zero_first() {
        let tracker = NonceTracker::new();
        tracker.record(channel(1), 0).unwrap();
        assert!(tracker.record(channel(1), 0).is_err());
    }

    #[test]
    fn test_tracker_scopes_nonces_per_channel() {
        let tracker = NonceTracker::new();
        tracker.record(channel(1), 9).unwrap();
        tracker.record(channel(2), 1).unwrap();
        assert_eq!(tracker.last_signed(channel(1)), Some(9));
        assert_eq!(tracker.last_signed(channel(2)), Some(1));
        assert_eq!(tracker.last_signed(channel(3)), None);
    }
}
