//! Deterministic identifier derivation for payments, escrows, streams, and
//! payment channels.
//!
//! Escrow and stream identifiers are never handed out by the contracts
//! through a registration round trip: both sides independently hash the
//! defining tuple and must arrive at the same 32 bytes. Field order and
//! widths below are therefore load-bearing — reordering two fields or
//! widening an integer silently produces ids the router will never
//! recognize.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, B256, U256, hex, keccak256};
use rand::RngExt;
use rand::rng;
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub B256);

        impl $name {
            /// Returns the raw 32-byte identifier.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0.0
            }
        }

        impl From<B256> for $name {
            fn from(value: B256) -> Self {
                Self(value)
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(value: [u8; 32]) -> Self {
                Self(B256::new(value))
            }
        }

        impl From<$name> for B256 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                B256::from_str(s).map(Self)
            }
        }
    };
}

id_type!(
    /// Identifier attached to a direct payment routed through the payment
    /// router. Caller-supplied, or freshly random via [`PaymentId::random`].
    PaymentId
);
id_type!(
    /// Identifier of an escrow, derived from its defining parameters by
    /// [`derive_escrow_id`].
    EscrowId
);
id_type!(
    /// Identifier of a payment stream, derived from its defining parameters
    /// by [`derive_stream_id`].
    StreamId
);
id_type!(
    /// Identifier of a payment channel. Derived from the unordered pair of
    /// participants by [`derive_channel_id`].
    ChannelId
);
id_type!(
    /// Identifier the service registry assigns to a listing.
    ServiceId
);
id_type!(
    /// Identifier the service registry assigns to a quote.
    QuoteId
);

impl PaymentId {
    /// Generates a fresh random identifier.
    ///
    /// Ids are drawn uniformly from the full 256-bit space, so collisions
    /// between concurrent senders are not a practical concern.
    #[must_use]
    pub fn random() -> Self {
        let bytes: [u8; 32] = rng().random();
        Self(B256::new(bytes))
    }
}

/// Computes the identifier the payment router assigns to an escrow created
/// by `initiator` for `recipient` under `payment_id` with the given
/// `deadline` (unix seconds).
///
/// The router keccak-hashes the tightly packed tuple
/// `(address, address, bytes32, uint256)` and hashes that digest once more;
/// both passes are part of the scheme.
#[must_use]
pub fn derive_escrow_id(
    initiator: Address,
    recipient: Address,
    payment_id: PaymentId,
    deadline: u64,
) -> EscrowId {
    let mut packed = Vec::with_capacity(20 + 20 + 32 + 32);
    packed.extend_from_slice(initiator.as_slice());
    packed.extend_from_slice(recipient.as_slice());
    packed.extend_from_slice(payment_id.as_bytes());
    packed.extend_from_slice(&U256::from(deadline).to_be_bytes::<32>());
    EscrowId(keccak256(keccak256(&packed)))
}

/// Computes the identifier the payment router assigns to a stream from
/// `sender` to `recipient` over the `[start_time, end_time]` window (unix
/// seconds).
///
/// Same double-keccak discipline as [`derive_escrow_id`], over the packed
/// tuple `(address, address, uint256, uint256)`.
#[must_use]
pub fn derive_stream_id(
    sender: Address,
    recipient: Address,
    start_time: u64,
    end_time: u64,
) -> StreamId {
    let mut packed = Vec::with_capacity(20 + 20 + 32 + 32);
    packed.extend_from_slice(sender.as_slice());
    packed.extend_from_slice(recipient.as_slice());
    packed.extend_from_slice(&U256::from(start_time).to_be_bytes::<32>());
    packed.extend_from_slice(&U256::from(end_time).to_be_bytes::<32>());
    StreamId(keccak256(keccak256(&packed)))
}

/// Computes the identifier of the channel between `party_a` and `party_b`.
///
/// The pair is canonicalized by byte order before hashing, so both
/// participants derive the same id whichever way round they pass the
/// addresses.
#[must_use]
pub fn derive_channel_id(party_a: Address, party_b: Address) -> ChannelId {
    let (lo, hi) = if party_a <= party_b {
        (party_a, party_b)
    } else {
        (party_b, party_a)
    };
    let mut packed = [0u8; 40];
    packed[..20].copy_from_slice(lo.as_slice());
    packed[20..].copy_from_slice(hi.as_slice());
    ChannelId(keccak256(packed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn pid(byte: u8) -> PaymentId {
        PaymentId::from([byte; 32])
    }

    #[test]
    fn test_escrow_id_is_deterministic() {
        let a = derive_escrow_id(addr(1), addr(2), pid(3), 1_700_000_000);
        let b = derive_escrow_id(addr(1), addr(2), pid(3), 1_700_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_escrow_id_depends_on_every_field() {
        let base = derive_escrow_id(addr(1), addr(2), pid(3), 100);
        assert_ne!(base, derive_escrow_id(addr(9), addr(2), pid(3), 100));
        assert_ne!(base, derive_escrow_id(addr(1), addr(9), pid(3), 100));
        assert_ne!(base, derive_escrow_id(addr(1), addr(2), pid(9), 100));
        assert_ne!(base, derive_escrow_id(addr(1), addr(2), pid(3), 101));
    }

    #[test]
    fn test_escrow_id_is_ordered() {
        // Initiator and recipient are distinct fields, not an unordered pair.
        assert_ne!(
            derive_escrow_id(addr(1), addr(2), pid(3), 100),
            derive_escrow_id(addr(2), addr(1), pid(3), 100)
        );
    }

    #[test]
    fn test_stream_id_is_deterministic_and_field_sensitive() {
        let base = derive_stream_id(addr(1), addr(2), 100, 200);
        assert_eq!(base, derive_stream_id(addr(1), addr(2), 100, 200));
        assert_ne!(base, derive_stream_id(addr(2), addr(1), 100, 200));
        assert_ne!(base, derive_stream_id(addr(1), addr(2), 101, 200));
        assert_ne!(base, derive_stream_id(addr(1), addr(2), 100, 201));
    }

    #[test]
    fn test_stream_id_distinguishes_swapped_times() {
        // (100, 200) and (200, 100) pack to different byte strings.
        assert_ne!(
            derive_stream_id(addr(1), addr(2), 100, 200),
            derive_stream_id(addr(1), addr(2), 200, 100)
        );
    }

    #[test]
    fn test_channel_id_is_order_independent() {
        assert_eq!(derive_channel_id(addr(1), addr(2)), derive_channel_id(addr(2), addr(1)));
        assert_ne!(derive_channel_id(addr(1), addr(2)), derive_channel_id(addr(1), addr(3)));
    }

    #[test]
    fn test_payment_id_random_draws_fresh_values() {
        assert_ne!(PaymentId::random(), PaymentId::random());
    }

    #[test]
    fn test_id_hex_roundtrip() {
        let id = EscrowId::from([0xAB; 32]);
        let parsed: EscrowId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
