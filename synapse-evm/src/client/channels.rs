//! Payment channel operations.
//!
//! Channels settle through one of three paths: a `cooperative_close` both
//! parties signed off on, or an `initiate_close`/`challenge_close` exchange
//! where the contract holds a challenge window open and honours the highest
//! mutually signed nonce presented before `finalize_close`. The signatures
//! those calls carry come from [`crate::signing::ChannelSigner`].

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use serde::{Deserialize, Serialize};
use synapse::TokenAmount;
use synapse::channel::ChannelState;
use synapse::ident::{ChannelId, derive_channel_id};
use synapse::types::ChannelStatus;

use super::SynapseClient;
use crate::contracts::IPaymentChannel;
use crate::error::ClientError;

/// On-chain view of a payment channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Identifier of the channel.
    pub channel_id: ChannelId,
    /// First participant, in the contract's canonical order.
    pub participant1: Address,
    /// Second participant.
    pub participant2: Address,
    /// On-chain balance of the first participant.
    pub balance1: TokenAmount,
    /// On-chain balance of the second participant.
    pub balance2: TokenAmount,
    /// Highest nonce the contract has accepted so far.
    pub nonce: u64,
    /// Lifecycle state of the channel.
    pub status: ChannelStatus,
    /// End of the challenge window (unix seconds), when a close is in
    /// progress.
    pub challenge_end: Option<u64>,
}

/// Outcome of opening a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOpenResult {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Identifier of the channel.
    pub channel_id: ChannelId,
}

impl<P: Provider> SynapseClient<P> {
    /// Opens a channel with `counterparty`, depositing `my_deposit` SYNX and
    /// expecting `their_deposit` from the other side.
    ///
    /// The channel id comes from the hub's `ChannelOpened` event, with the
    /// order-independent local derivation as fallback.
    pub async fn open_channel(
        &self,
        counterparty: Address,
        my_deposit: TokenAmount,
        their_deposit: TokenAmount,
    ) -> Result<ChannelOpenResult, ClientError> {
        let opener = self.require_signer()?;
        let hub_address = self.config.contracts.payment_channel;
        let hub = IPaymentChannel::new(hub_address, &self.provider);
        let calldata = hub
            .openChannel(counterparty, my_deposit.wire(), their_deposit.wire())
            .calldata()
            .clone();
        let receipt = self.send_call(hub_address, calldata).await?;
        let tx_hash = Self::ensure_success(&receipt)?;
        let channel_id = Self::decode_event::<IPaymentChannel::ChannelOpened>(&receipt, hub_address)
            .map_or_else(
                || derive_channel_id(opener, counterparty),
                |event| ChannelId::from(event.channelId),
            );
        Ok(ChannelOpenResult {
            tx_hash,
            channel_id,
        })
    }

    /// Adds `amount` SYNX to the signing account's side of the channel with
    /// `counterparty`.
    pub async fn fund_channel(
        &self,
        counterparty: Address,
        amount: TokenAmount,
    ) -> Result<TxHash, ClientError> {
        let hub_address = self.config.contracts.payment_channel;
        let hub = IPaymentChannel::new(hub_address, &self.provider);
        let calldata = hub.addFunds(counterparty, amount.wire()).calldata().clone();
        let receipt = self.send_call(hub_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Current on-chain state of the channel between `party1` and `party2`.
    ///
    /// The channel id is derived locally and is order-independent, so either
    /// participant can query with the arguments either way round. A pair
    /// with no channel decodes to the zero-valued record with status
    /// [`ChannelStatus::None`].
    pub async fn get_channel(
        &self,
        party1: Address,
        party2: Address,
    ) -> Result<ChannelInfo, ClientError> {
        let channel_id = derive_channel_id(party1, party2);
        let hub = IPaymentChannel::new(self.config.contracts.payment_channel, &self.provider);
        let channel = hub.channels(channel_id.into()).call().await?;

        let status = ChannelStatus::try_from(channel.status)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        let nonce = u64::try_from(channel.nonce)
            .map_err(|_| ClientError::Decode("channel nonce out of range".into()))?;
        let challenge_end = u64::try_from(channel.challengeEnd)
            .map_err(|_| ClientError::Decode("challengeEnd out of range".into()))?;

        Ok(ChannelInfo {
            channel_id,
            participant1: channel.participant1,
            participant2: channel.participant2,
            balance1: TokenAmount::from_wire(channel.balance1),
            balance2: TokenAmount::from_wire(channel.balance2),
            nonce,
            status,
            challenge_end: (challenge_end != 0).then_some(challenge_end),
        })
    }

    /// Settles and closes the channel with `counterparty` at `state`, which
    /// both parties have signed.
    pub async fn cooperative_close(
        &self,
        counterparty: Address,
        state: &ChannelState,
        sig1: Bytes,
        sig2: Bytes,
    ) -> Result<TxHash, ClientError> {
        let hub_address = self.config.contracts.payment_channel;
        let hub = IPaymentChannel::new(hub_address, &self.provider);
        let calldata = hub
            .cooperativeClose(
                counterparty,
                state.balance1.wire(),
                state.balance2.wire(),
                U256::from(state.nonce),
                sig1,
                sig2,
            )
            .calldata()
            .clone();
        let receipt = self.send_call(hub_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Starts a unilateral close at `state`, opening the challenge window.
    pub async fn initiate_close(
        &self,
        counterparty: Address,
        state: &ChannelState,
        sig1: Bytes,
        sig2: Bytes,
    ) -> Result<TxHash, ClientError> {
        let hub_address = self.config.contracts.payment_channel;
        let hub = IPaymentChannel::new(hub_address, &self.provider);
        let calldata = hub
            .initiateClose(
                counterparty,
                state.balance1.wire(),
                state.balance2.wire(),
                U256::from(state.nonce),
                sig1,
                sig2,
            )
            .calldata()
            .clone();
        let receipt = self.send_call(hub_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Counters an in-progress close with a higher-nonce `state`.
    pub async fn challenge_close(
        &self,
        counterparty: Address,
        state: &ChannelState,
        sig1: Bytes,
        sig2: Bytes,
    ) -> Result<TxHash, ClientError> {
        let hub_address = self.config.contracts.payment_channel;
        let hub = IPaymentChannel::new(hub_address, &self.provider);
        let calldata = hub
            .challengeClose(
                counterparty,
                state.balance1.wire(),
                state.balance2.wire(),
                U256::from(state.nonce),
                sig1,
                sig2,
            )
            .calldata()
            .clone();
        let receipt = self.send_call(hub_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Settles the channel after its challenge window has elapsed.
    pub async fn finalize_close(&self, counterparty: Address) -> Result<TxHash, ClientError> {
        let hub_address = self.config.contracts.payment_channel;
        let hub = IPaymentChannel::new(hub_address, &self.provider);
        let calldata = hub.finalizeClose(counterparty).calldata().clone();
        let receipt = self.send_call(hub_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Length of the unilateral-close challenge window, in seconds.
    pub async fn challenge_period(&self) -> Result<u64, ClientError> {
        let hub = IPaymentChannel::new(self.config.contracts.payment_channel, &self.provider);
        let period = hub.challengePeriod().call().await?;
        u64::try_from(period).map_err(|_| ClientError::Decode("challengePeriod out of range".into()))
    }
}
