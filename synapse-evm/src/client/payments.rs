//! Payment router operations: direct payments, escrows, and streams.

use alloy_primitives::{Address, B256, Bytes, TxHash, U256};
use alloy_provider::Provider;
use serde::{Deserialize, Serialize};
use synapse::TokenAmount;
use synapse::ident::{EscrowId, PaymentId, StreamId, derive_escrow_id, derive_stream_id};

use super::SynapseClient;
use crate::contracts::IPaymentRouter;
use crate::error::ClientError;

/// Outcome of a direct payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Identifier the payment was routed under.
    pub payment_id: PaymentId,
    /// Protocol fee reported by the router's `Payment` event, when the
    /// receipt carried one.
    pub fee: Option<TokenAmount>,
}

/// Outcome of creating an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowResult {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Identifier of the created escrow.
    pub escrow_id: EscrowId,
    /// Payment identifier the escrow was created under.
    pub payment_id: PaymentId,
}

/// Outcome of creating a payment stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResult {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Identifier of the created stream.
    pub stream_id: StreamId,
}

/// One entry of a batch payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayment {
    /// Recipient address.
    pub recipient: Address,
    /// Amount for this recipient.
    pub amount: TokenAmount,
}

/// Cumulative payment counters the router keeps per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStats {
    /// Number of payments sent.
    pub total_payments_sent: U256,
    /// Number of payments received.
    pub total_payments_received: U256,
    /// Total SYNX volume sent.
    pub total_volume_sent: TokenAmount,
    /// Total SYNX volume received.
    pub total_volume_received: TokenAmount,
}

impl<P: Provider> SynapseClient<P> {
    /// Sends `amount` SYNX to `recipient` through the router.
    ///
    /// A fresh random [`PaymentId`] is generated when none is supplied. The
    /// returned fee is decoded from the router's `Payment` event.
    pub async fn pay(
        &self,
        recipient: Address,
        amount: TokenAmount,
        payment_id: Option<PaymentId>,
        metadata: Option<Bytes>,
    ) -> Result<PaymentResult, ClientError> {
        let payment_id = payment_id.unwrap_or_else(PaymentId::random);
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router
            .pay(
                recipient,
                amount.wire(),
                payment_id.into(),
                metadata.unwrap_or_default(),
            )
            .calldata()
            .clone();
        let receipt = self.send_call(router_address, calldata).await?;
        let tx_hash = Self::ensure_success(&receipt)?;
        let fee = Self::decode_event::<IPaymentRouter::Payment>(&receipt, router_address)
            .map(|event| TokenAmount::from_wire(event.fee));
        Ok(PaymentResult {
            tx_hash,
            payment_id,
            fee,
        })
    }

    /// Pays several recipients in one transaction. Each entry is routed
    /// under its own fresh random payment identifier.
    ///
    /// # Errors
    ///
    /// [`ClientError::EmptyBatch`] when `payments` is empty, before any
    /// network interaction.
    pub async fn batch_pay(&self, payments: &[BatchPayment]) -> Result<TxHash, ClientError> {
        if payments.is_empty() {
            return Err(ClientError::EmptyBatch);
        }
        let recipients: Vec<Address> = payments.iter().map(|p| p.recipient).collect();
        let amounts: Vec<U256> = payments.iter().map(|p| p.amount.wire()).collect();
        let payment_ids: Vec<B256> = payments.iter().map(|_| PaymentId::random().into()).collect();
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router
            .batchPay(recipients, amounts, payment_ids, Vec::new())
            .calldata()
            .clone();
        let receipt = self.send_call(router_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Locks `amount` SYNX for `recipient` until released or refunded, with
    /// `arbiter` able to resolve a dispute before `deadline` (unix seconds).
    ///
    /// The escrow id is read from the router's `EscrowCreated` event; when
    /// the receipt carries no decodable log the id is derived locally from
    /// the same parameters the router hashes.
    pub async fn create_escrow(
        &self,
        recipient: Address,
        arbiter: Address,
        amount: TokenAmount,
        deadline: u64,
        payment_id: Option<PaymentId>,
    ) -> Result<EscrowResult, ClientError> {
        let initiator = self.require_signer()?;
        let payment_id = payment_id.unwrap_or_else(PaymentId::random);
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router
            .createEscrow(
                recipient,
                arbiter,
                amount.wire(),
                U256::from(deadline),
                payment_id.into(),
                Bytes::new(),
            )
            .calldata()
            .clone();
        let receipt = self.send_call(router_address, calldata).await?;
        let tx_hash = Self::ensure_success(&receipt)?;
        let escrow_id = Self::decode_event::<IPaymentRouter::EscrowCreated>(&receipt, router_address)
            .map_or_else(
                || derive_escrow_id(initiator, recipient, payment_id, deadline),
                |event| EscrowId::from(event.escrowId),
            );
        Ok(EscrowResult {
            tx_hash,
            escrow_id,
            payment_id,
        })
    }

    /// Releases the escrowed funds to the recipient.
    pub async fn release_escrow(&self, escrow_id: EscrowId) -> Result<TxHash, ClientError> {
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router.releaseEscrow(escrow_id.into()).calldata().clone();
        let receipt = self.send_call(router_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Returns the escrowed funds to the initiator.
    pub async fn refund_escrow(&self, escrow_id: EscrowId) -> Result<TxHash, ClientError> {
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router.refundEscrow(escrow_id.into()).calldata().clone();
        let receipt = self.send_call(router_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Opens a stream paying `recipient` a total of `total_amount` SYNX
    /// linearly over `[start_time, end_time]` (unix seconds).
    ///
    /// The stream id comes from the router's `StreamCreated` event, with the
    /// local derivation as fallback.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidStreamWindow`] when `end_time <= start_time`,
    /// before any network interaction.
    pub async fn create_stream(
        &self,
        recipient: Address,
        total_amount: TokenAmount,
        start_time: u64,
        end_time: u64,
    ) -> Result<StreamResult, ClientError> {
        if end_time <= start_time {
            return Err(ClientError::InvalidStreamWindow {
                start_time,
                end_time,
            });
        }
        let sender = self.require_signer()?;
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router
            .createStream(
                recipient,
                total_amount.wire(),
                U256::from(start_time),
                U256::from(end_time),
            )
            .calldata()
            .clone();
        let receipt = self.send_call(router_address, calldata).await?;
        let tx_hash = Self::ensure_success(&receipt)?;
        let stream_id = Self::decode_event::<IPaymentRouter::StreamCreated>(&receipt, router_address)
            .map_or_else(
                || derive_stream_id(sender, recipient, start_time, end_time),
                |event| StreamId::from(event.streamId),
            );
        Ok(StreamResult { tx_hash, stream_id })
    }

    /// Withdraws whatever has vested from the stream to the recipient.
    pub async fn withdraw_from_stream(&self, stream_id: StreamId) -> Result<TxHash, ClientError> {
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router.withdrawFromStream(stream_id.into()).calldata().clone();
        let receipt = self.send_call(router_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Cancels the stream, settling vested funds to the recipient and the
    /// remainder back to the sender.
    pub async fn cancel_stream(&self, stream_id: StreamId) -> Result<TxHash, ClientError> {
        let router_address = self.config.contracts.payment_router;
        let router = IPaymentRouter::new(router_address, &self.provider);
        let calldata = router.cancelStream(stream_id.into()).calldata().clone();
        let receipt = self.send_call(router_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// The router's base fee, in basis points.
    pub async fn base_fee_bps(&self) -> Result<u64, ClientError> {
        let router = IPaymentRouter::new(self.config.contracts.payment_router, &self.provider);
        let bps = router.baseFeeBps().call().await?;
        u64::try_from(bps).map_err(|_| ClientError::Decode("baseFeeBps out of range".into()))
    }

    /// Cumulative payment counters for `agent`.
    ///
    /// Addresses with no payment history decode to the zero-valued record,
    /// mirroring the contract's storage semantics.
    pub async fn payment_stats(&self, agent: Address) -> Result<PaymentStats, ClientError> {
        let router = IPaymentRouter::new(self.config.contracts.payment_router, &self.provider);
        let stats = router.agentStats(agent).call().await?;
        Ok(PaymentStats {
            total_payments_sent: stats.totalPaymentsSent,
            total_payments_received: stats.totalPaymentsReceived,
            total_volume_sent: TokenAmount::from_wire(stats.totalVolumeSent),
            total_volume_received: TokenAmount::from_wire(stats.totalVolumeReceived),
        })
    }
}
