//! Solidity interface definitions for the deployed SYNAPSE contract suite.
//!
//! Only the functions and events the client actually uses are declared:
//! - [`ISynapseToken`] — ERC-20 subset of the SYNX token
//! - [`IPaymentRouter`] — direct payments, escrows, and streams
//! - [`IReputationRegistry`] — agent lifecycle, ratings, disputes
//! - [`IServiceRegistry`] — listings, quotes, and pricing
//! - [`IPaymentChannel`] — bidirectional payment channels

use alloy_sol_types::sol;

sol! {
    /// ERC-20 subset of the SYNX token.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface ISynapseToken {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

sol! {
    /// Payment router: direct payments, escrows, and streams.
    ///
    /// Escrow and stream ids are derived, not stored sequentially; the
    /// creation events carry the id the contract settled on.
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IPaymentRouter {
        function pay(address recipient, uint256 amount, bytes32 paymentId, bytes metadata) external returns (bool);
        function batchPay(address[] recipients, uint256[] amounts, bytes32[] paymentIds, bytes[] metadata) external returns (bool);
        function createEscrow(address recipient, address arbiter, uint256 amount, uint256 deadline, bytes32 paymentId, bytes metadata) external returns (bytes32);
        function releaseEscrow(bytes32 escrowId) external returns (bool);
        function refundEscrow(bytes32 escrowId) external returns (bool);
        function createStream(address recipient, uint256 totalAmount, uint256 startTime, uint256 endTime) external returns (bytes32);
        function withdrawFromStream(bytes32 streamId) external returns (uint256);
        function cancelStream(bytes32 streamId) external returns (bool);
        function baseFeeBps() external view returns (uint256);
        function agentStats(address agent) external view returns (uint256 totalPaymentsSent, uint256 totalPaymentsReceived, uint256 totalVolumeSent, uint256 totalVolumeReceived);
        event Payment(address indexed sender, address indexed recipient, uint256 amount, uint256 fee, bytes32 paymentId);
        event EscrowCreated(bytes32 indexed escrowId, address indexed sender, address indexed recipient, uint256 amount, uint256 deadline);
        event StreamCreated(bytes32 indexed streamId, address indexed sender, address indexed recipient, uint256 totalAmount, uint256 startTime, uint256 endTime);
    }
}

sol! {
    /// Reputation registry: agent lifecycle, stake, ratings, and disputes.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IReputationRegistry {
        function registerAgent(string name, string metadataUri, uint256 stakeAmount) external returns (bool);
        function deregisterAgent() external returns (bool);
        function increaseStake(uint256 amount) external returns (bool);
        function decreaseStake(uint256 amount) external returns (bool);
        function agents(address agent) external view returns (bool registered, string name, uint256 stake, uint256 reputationScore, uint256 totalTransactions, uint256 successfulTransactions, uint256 registeredAt);
        function getTier(address agent) external view returns (uint8);
        function getSuccessRate(address agent) external view returns (uint256);
        function createDispute(address defendant, string reason, bytes32 transactionId) external returns (bytes32);
        function rateService(address provider, string category, uint8 rating) external returns (bool);
        function getServiceRating(address provider, string category) external view returns (uint256 totalRatings, uint256 averageRating);
        event AgentRegistered(address indexed agent, string name, uint256 stake);
        event ReputationUpdated(address indexed agent, uint256 oldScore, uint256 newScore);
    }
}

sol! {
    /// Service registry: listings, category search, quotes, and pricing.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IServiceRegistry {
        function registerService(string name, string category, string description, string endpoint, uint256 basePrice, uint8 pricingModel) external returns (bytes32);
        function updateServiceDescription(bytes32 serviceId, string description) external returns (bool);
        function updateServiceEndpoint(bytes32 serviceId, string endpoint) external returns (bool);
        function updateServicePrice(bytes32 serviceId, uint256 newPrice) external returns (bool);
        function activateService(bytes32 serviceId) external returns (bool);
        function deactivateService(bytes32 serviceId) external returns (bool);
        function services(bytes32 serviceId) external view returns (address provider, string name, string category, string description, string endpoint, uint256 basePrice, uint8 pricingModel, bool active, uint256 createdAt);
        function getServicesByCategory(string category) external view returns (bytes32[]);
        function categoryExists(string category) external view returns (bool);
        function calculatePrice(bytes32 serviceId, uint256 quantity) external view returns (uint256);
        function requestQuote(bytes32 serviceId, uint256 quantity, bytes specs) external returns (bytes32);
        function acceptQuote(bytes32 quoteId) external returns (bool);
        event ServiceRegistered(bytes32 indexed serviceId, address indexed provider, string name, string category);
    }
}

sol! {
    /// Payment channel hub: open, fund, and the three close paths.
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IPaymentChannel {
        function openChannel(address counterparty, uint256 myDeposit, uint256 theirDeposit) external returns (bytes32);
        function addFunds(address counterparty, uint256 amount) external returns (bool);
        function cooperativeClose(address counterparty, uint256 balance1, uint256 balance2, uint256 nonce, bytes sig1, bytes sig2) external returns (bool);
        function initiateClose(address counterparty, uint256 balance1, uint256 balance2, uint256 nonce, bytes sig1, bytes sig2) external returns (bool);
        function challengeClose(address counterparty, uint256 balance1, uint256 balance2, uint256 nonce, bytes sig1, bytes sig2) external returns (bool);
        function finalizeClose(address counterparty) external returns (bool);
        function channels(bytes32 channelId) external view returns (address participant1, address participant2, uint256 balance1, uint256 balance2, uint256 nonce, uint8 status, uint256 challengeEnd);
        function challengePeriod() external view returns (uint256);
        event ChannelOpened(bytes32 indexed channelId, address indexed party1, address indexed party2, uint256 deposit1, uint256 deposit2);
        event ChannelClosed(bytes32 indexed channelId, uint256 finalBalance1, uint256 finalBalance2);
    }
}
