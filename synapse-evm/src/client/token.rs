//! SYNX token operations.

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use synapse::TokenAmount;

use super::SynapseClient;
use crate::contracts::ISynapseToken;
use crate::error::ClientError;

impl<P: Provider> SynapseClient<P> {
    /// SYNX balance of `address`.
    pub async fn balance_of(&self, address: Address) -> Result<TokenAmount, ClientError> {
        let token = ISynapseToken::new(self.config.contracts.token, &self.provider);
        let balance = token.balanceOf(address).call().await?;
        Ok(TokenAmount::from_wire(balance))
    }

    /// SYNX balance of the signing account.
    ///
    /// # Errors
    ///
    /// [`ClientError::NoSigner`] on a read-only client.
    pub async fn balance(&self) -> Result<TokenAmount, ClientError> {
        let address = self.require_signer()?;
        self.balance_of(address).await
    }

    /// Remaining allowance `owner` has granted `spender`.
    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<TokenAmount, ClientError> {
        let token = ISynapseToken::new(self.config.contracts.token, &self.provider);
        let allowance = token.allowance(owner, spender).call().await?;
        Ok(TokenAmount::from_wire(allowance))
    }

    /// Total SYNX supply.
    pub async fn total_supply(&self) -> Result<TokenAmount, ClientError> {
        let token = ISynapseToken::new(self.config.contracts.token, &self.provider);
        let supply = token.totalSupply().call().await?;
        Ok(TokenAmount::from_wire(supply))
    }

    /// Ticker symbol of the deployed token.
    pub async fn token_symbol(&self) -> Result<String, ClientError> {
        let token = ISynapseToken::new(self.config.contracts.token, &self.provider);
        Ok(token.symbol().call().await?)
    }

    /// Decimal places the deployed token reports. SYNX uses 18; anything
    /// else means the configured token address does not match the amount
    /// codec and amounts would be mis-scaled.
    pub async fn token_decimals(&self) -> Result<u8, ClientError> {
        let token = ISynapseToken::new(self.config.contracts.token, &self.provider);
        Ok(token.decimals().call().await?)
    }

    /// Transfers `amount` SYNX to `to`.
    pub async fn transfer(&self, to: Address, amount: TokenAmount) -> Result<TxHash, ClientError> {
        let token_address = self.config.contracts.token;
        let token = ISynapseToken::new(token_address, &self.provider);
        let calldata = token.transfer(to, amount.wire()).calldata().clone();
        let receipt = self.send_call(token_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Approves `spender` to move up to `amount` SYNX from the signing
    /// account.
    pub async fn approve(
        &self,
        spender: Address,
        amount: TokenAmount,
    ) -> Result<TxHash, ClientError> {
        let token_address = self.config.contracts.token;
        let token = ISynapseToken::new(token_address, &self.provider);
        let calldata = token.approve(spender, amount.wire()).calldata().clone();
        let receipt = self.send_call(token_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Grants the router, reputation registry, service registry, and channel
    /// hub an unlimited SYNX allowance, one transaction each.
    ///
    /// Returns the transaction hashes in that order. Stops at the first
    /// failure; earlier approvals stay in effect.
    pub async fn approve_all(&self) -> Result<Vec<TxHash>, ClientError> {
        let contracts = &self.config.contracts;
        let spenders = [
            contracts.payment_router,
            contracts.reputation,
            contracts.service_registry,
            contracts.payment_channel,
        ];
        let unlimited = TokenAmount::from_wire(U256::MAX);
        let mut hashes = Vec::with_capacity(spenders.len());
        for spender in spenders {
            hashes.push(self.approve(spender, unlimited).await?);
        }
        Ok(hashes)
    }
}
