#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EVM client for the SYNAPSE Protocol contract suite.
//!
//! The SYNAPSE protocol runs as five deployed contracts — the SYNX token, a
//! payment router (direct payments, escrows, streams), a reputation
//! registry, a service registry, and a payment channel hub. This crate wraps
//! them in one typed client: it validates inputs, converts display amounts
//! to their wire form, encodes calls, submits transactions, waits for
//! receipts, and decodes results into the value records from the `synapse`
//! core crate.
//!
//! The client holds no authoritative state. Every read refetches from the
//! contracts; every write is a submission followed by a receipt wait, never
//! a cache update. Failed submissions are never retried internally, because
//! a blind retry under an ambiguous account nonce risks double spending.
//!
//! # Modules
//!
//! - [`client`] - The [`SynapseClient`] façade, one operation module per contract
//! - [`config`] - Endpoints, contract addresses, and timeouts
//! - [`contracts`] - `sol!` interface declarations for the deployed suite
//! - [`error`] - The [`ClientError`] taxonomy
//! - [`provider`] - RPC transport and filler stack construction
//! - [`signing`] - Off-chain channel state signing and verification
//!
//! # Feature Flags
//!
//! - `telemetry` - `tracing` instrumentation on transaction submission

pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod provider;
pub mod signing;

pub use client::SynapseClient;
pub use config::{ClientConfig, ContractAddresses, RpcEndpoint};
pub use error::ClientError;
pub use signing::{ChannelSigner, SignerLike, verify_state};
