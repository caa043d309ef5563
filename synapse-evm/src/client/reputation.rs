//! Reputation registry operations: agent lifecycle, stake, ratings, and
//! disputes.

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use serde::{Deserialize, Serialize};
use synapse::TokenAmount;
use synapse::ident::PaymentId;
use synapse::types::Tier;

use super::SynapseClient;
use crate::contracts::IReputationRegistry;
use crate::error::ClientError;

/// On-chain profile of a registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Whether the address holds an active registration.
    pub registered: bool,
    /// Self-declared agent name.
    pub name: String,
    /// Currently staked SYNX.
    pub stake: TokenAmount,
    /// Accumulated reputation score.
    pub reputation_score: U256,
    /// Transactions recorded against this agent.
    pub total_transactions: U256,
    /// Transactions that completed successfully.
    pub successful_transactions: U256,
    /// Unix timestamp of registration.
    pub registered_at: u64,
    /// Reputation tier derived from score and stake.
    pub tier: Tier,
    /// Success rate in percent.
    pub success_rate_percent: f64,
}

/// Aggregate rating of a provider within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRating {
    /// Number of ratings submitted.
    pub total_ratings: U256,
    /// Average rating, scaled as the contract stores it.
    pub average_rating: U256,
}

impl<P: Provider> SynapseClient<P> {
    /// Registers the signing account as an agent, staking `stake` SYNX.
    pub async fn register_agent(
        &self,
        name: &str,
        metadata_uri: &str,
        stake: TokenAmount,
    ) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.reputation;
        let registry = IReputationRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .registerAgent(name.to_owned(), metadata_uri.to_owned(), stake.wire())
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Deregisters the signing account and withdraws its stake.
    pub async fn deregister_agent(&self) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.reputation;
        let registry = IReputationRegistry::new(registry_address, &self.provider);
        let calldata = registry.deregisterAgent().calldata().clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Adds `amount` SYNX to the signing account's stake.
    pub async fn increase_stake(&self, amount: TokenAmount) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.reputation;
        let registry = IReputationRegistry::new(registry_address, &self.provider);
        let calldata = registry.increaseStake(amount.wire()).calldata().clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Withdraws `amount` SYNX from the signing account's stake.
    pub async fn decrease_stake(&self, amount: TokenAmount) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.reputation;
        let registry = IReputationRegistry::new(registry_address, &self.provider);
        let calldata = registry.decreaseStake(amount.wire()).calldata().clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Profile for `address`, or for the signing account when `None`.
    ///
    /// Joins the registry's `agents`, `getTier`, and `getSuccessRate` views
    /// into one record. Unregistered addresses decode to the zero-valued
    /// record with `registered == false`.
    pub async fn get_agent(&self, address: Option<Address>) -> Result<AgentInfo, ClientError> {
        let address = match address {
            Some(address) => address,
            None => self.require_signer()?,
        };
        let registry = IReputationRegistry::new(self.config.contracts.reputation, &self.provider);
        let agent = registry.agents(address).call().await?;
        let tier = registry.getTier(address).call().await?;
        let success_rate = registry.getSuccessRate(address).call().await?;

        let tier = Tier::try_from(tier).map_err(|e| ClientError::Decode(e.to_string()))?;
        let registered_at = u64::try_from(agent.registeredAt)
            .map_err(|_| ClientError::Decode("registeredAt out of range".into()))?;
        // The registry reports the rate scaled by 100 (two implied decimals).
        let success_rate_percent = u64::try_from(success_rate)
            .map_err(|_| ClientError::Decode("success rate out of range".into()))?
            as f64
            / 100.0;

        Ok(AgentInfo {
            registered: agent.registered,
            name: agent.name,
            stake: TokenAmount::from_wire(agent.stake),
            reputation_score: agent.reputationScore,
            total_transactions: agent.totalTransactions,
            successful_transactions: agent.successfulTransactions,
            registered_at,
            tier,
            success_rate_percent,
        })
    }

    /// Opens a dispute against `defendant` over the payment identified by
    /// `transaction_id`.
    ///
    /// The registry assigns the dispute id internally and emits no event
    /// carrying it, so the id cannot be recovered from the receipt; only the
    /// transaction hash is returned.
    pub async fn create_dispute(
        &self,
        defendant: Address,
        reason: &str,
        transaction_id: PaymentId,
    ) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.reputation;
        let registry = IReputationRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .createDispute(defendant, reason.to_owned(), transaction_id.into())
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Rates `provider` within `category` on the 1–5 scale.
    ///
    /// # Errors
    ///
    /// [`ClientError::RatingOutOfRange`] for anything outside `1..=5`,
    /// before any network interaction.
    pub async fn rate_service(
        &self,
        provider: Address,
        category: &str,
        rating: u8,
    ) -> Result<TxHash, ClientError> {
        if !(1..=5).contains(&rating) {
            return Err(ClientError::RatingOutOfRange(rating));
        }
        let registry_address = self.config.contracts.reputation;
        let registry = IReputationRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .rateService(provider, category.to_owned(), rating)
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Aggregate rating of `provider` within `category`.
    ///
    /// Unrated providers decode to the zero-valued record.
    pub async fn service_rating(
        &self,
        provider: Address,
        category: &str,
    ) -> Result<ServiceRating, ClientError> {
        let registry = IReputationRegistry::new(self.config.contracts.reputation, &self.provider);
        let rating = registry
            .getServiceRating(provider, category.to_owned())
            .call()
            .await?;
        Ok(ServiceRating {
            total_ratings: rating.totalRatings,
            average_rating: rating.averageRating,
        })
    }
}
