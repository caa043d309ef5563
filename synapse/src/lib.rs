#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the SYNAPSE Protocol.
//!
//! This crate provides the chain-agnostic foundations of the SYNAPSE SDK:
//! exact fixed-point token amounts, deterministic identifier derivation, and
//! the off-chain payment channel state codec. It knows nothing about RPC
//! transports or signing keys — those live in `synapse-evm`, which layers the
//! contract façade on top of these types.
//!
//! All durable state of the protocol lives in the deployed contracts. The
//! types here exist so the client and the contracts agree, bit for bit, on
//! three things: how a decimal SYNX amount maps onto a `uint256`, how the
//! 32-byte identifiers for escrows, streams, and channels are derived, and
//! what byte string a channel state signature actually covers.
//!
//! # Modules
//!
//! - [`address`] - Address parsing with EIP-55 checksum validation
//! - [`amount`] - Display-decimal ↔ 18-decimal fixed-point conversion
//! - [`channel`] - Channel state encoding and last-signed-nonce tracking
//! - [`ident`] - Deterministic 32-byte identifier derivation
//! - [`types`] - Protocol enumerations (tiers, pricing models, channel status)

pub mod address;
pub mod amount;
pub mod channel;
pub mod ident;
pub mod types;

pub use amount::TokenAmount;
pub use channel::{ChannelState, NonceTracker};
pub use ident::{
    ChannelId, EscrowId, PaymentId, QuoteId, ServiceId, StreamId, derive_channel_id,
    derive_escrow_id, derive_stream_id,
};
