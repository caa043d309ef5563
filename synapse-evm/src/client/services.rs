//! Service registry operations: listings, category search, quotes, and
//! pricing.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use serde::{Deserialize, Serialize};
use synapse::TokenAmount;
use synapse::ident::{QuoteId, ServiceId};
use synapse::types::PricingModel;

use super::SynapseClient;
use crate::contracts::IServiceRegistry;
use crate::error::ClientError;

/// Listing stored in the service registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Provider that registered the service.
    pub provider: Address,
    /// Service name.
    pub name: String,
    /// Category the service is listed under.
    pub category: String,
    /// Free-form description.
    pub description: String,
    /// API endpoint URL the provider serves.
    pub endpoint: String,
    /// Base price per unit of the pricing model.
    pub base_price: TokenAmount,
    /// How the service prices its work.
    pub pricing_model: PricingModel,
    /// Whether the listing is active.
    pub active: bool,
    /// Unix timestamp of registration.
    pub created_at: u64,
}

/// Outcome of registering a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRegistration {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Id from the registry's `ServiceRegistered` event, or `None` when the
    /// receipt carried no decodable log.
    pub service_id: Option<ServiceId>,
}

impl<P: Provider> SynapseClient<P> {
    /// Registers a service under the signing account.
    ///
    /// The assigned id is decoded from the registry's `ServiceRegistered`
    /// event.
    pub async fn register_service(
        &self,
        name: &str,
        category: &str,
        description: &str,
        endpoint: &str,
        base_price: TokenAmount,
        pricing_model: PricingModel,
    ) -> Result<ServiceRegistration, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .registerService(
                name.to_owned(),
                category.to_owned(),
                description.to_owned(),
                endpoint.to_owned(),
                base_price.wire(),
                pricing_model.into(),
            )
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        let tx_hash = Self::ensure_success(&receipt)?;
        let service_id =
            Self::decode_event::<IServiceRegistry::ServiceRegistered>(&receipt, registry_address)
                .map(|event| ServiceId::from(event.serviceId));
        Ok(ServiceRegistration {
            tx_hash,
            service_id,
        })
    }

    /// Replaces the listing's description.
    pub async fn update_service_description(
        &self,
        service_id: ServiceId,
        description: &str,
    ) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .updateServiceDescription(service_id.into(), description.to_owned())
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Replaces the listing's endpoint URL.
    pub async fn update_service_endpoint(
        &self,
        service_id: ServiceId,
        endpoint: &str,
    ) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .updateServiceEndpoint(service_id.into(), endpoint.to_owned())
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Replaces the listing's base price.
    pub async fn update_service_price(
        &self,
        service_id: ServiceId,
        new_price: TokenAmount,
    ) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .updateServicePrice(service_id.into(), new_price.wire())
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Reactivates a deactivated listing.
    pub async fn activate_service(&self, service_id: ServiceId) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry.activateService(service_id.into()).calldata().clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Takes the listing off the market without deleting it.
    pub async fn deactivate_service(&self, service_id: ServiceId) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry.deactivateService(service_id.into()).calldata().clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Listing stored under `service_id`.
    ///
    /// Unknown ids decode to the zero-valued record (zero provider address,
    /// empty strings), mirroring the contract's storage semantics.
    pub async fn get_service(&self, service_id: ServiceId) -> Result<ServiceInfo, ClientError> {
        let registry = IServiceRegistry::new(self.config.contracts.service_registry, &self.provider);
        let service = registry.services(service_id.into()).call().await?;
        let pricing_model = PricingModel::try_from(service.pricingModel)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        let created_at = u64::try_from(service.createdAt)
            .map_err(|_| ClientError::Decode("createdAt out of range".into()))?;
        Ok(ServiceInfo {
            provider: service.provider,
            name: service.name,
            category: service.category,
            description: service.description,
            endpoint: service.endpoint,
            base_price: TokenAmount::from_wire(service.basePrice),
            pricing_model,
            active: service.active,
            created_at,
        })
    }

    /// Ids of every service listed under `category`.
    pub async fn services_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ServiceId>, ClientError> {
        let registry = IServiceRegistry::new(self.config.contracts.service_registry, &self.provider);
        let ids = registry
            .getServicesByCategory(category.to_owned())
            .call()
            .await?;
        Ok(ids.into_iter().map(ServiceId::from).collect())
    }

    /// Whether any service has ever been listed under `category`.
    pub async fn category_exists(&self, category: &str) -> Result<bool, ClientError> {
        let registry = IServiceRegistry::new(self.config.contracts.service_registry, &self.provider);
        Ok(registry.categoryExists(category.to_owned()).call().await?)
    }

    /// Price the registry quotes for `quantity` units of the service.
    pub async fn calculate_price(
        &self,
        service_id: ServiceId,
        quantity: u64,
    ) -> Result<TokenAmount, ClientError> {
        let registry = IServiceRegistry::new(self.config.contracts.service_registry, &self.provider);
        let price = registry
            .calculatePrice(service_id.into(), U256::from(quantity))
            .call()
            .await?;
        Ok(TokenAmount::from_wire(price))
    }

    /// Requests a quote for `quantity` units of the service, with optional
    /// provider-specific `specs`.
    ///
    /// The registry assigns the quote id internally and emits no event
    /// carrying it, so the id cannot be recovered from the receipt; only the
    /// transaction hash is returned.
    pub async fn request_quote(
        &self,
        service_id: ServiceId,
        quantity: u64,
        specs: Option<Bytes>,
    ) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry
            .requestQuote(
                service_id.into(),
                U256::from(quantity),
                specs.unwrap_or_default(),
            )
            .calldata()
            .clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }

    /// Accepts a quote, paying its quoted price.
    pub async fn accept_quote(&self, quote_id: QuoteId) -> Result<TxHash, ClientError> {
        let registry_address = self.config.contracts.service_registry;
        let registry = IServiceRegistry::new(registry_address, &self.provider);
        let calldata = registry.acceptQuote(quote_id.into()).calldata().clone();
        let receipt = self.send_call(registry_address, calldata).await?;
        Self::ensure_success(&receipt)
    }
}
