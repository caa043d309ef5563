//! Protocol enumerations mirrored from the deployed contract suite.
//!
//! Discriminant values are part of the on-chain ABI and must not change.
//! Decoding from `u8` rejects values outside the defined range instead of
//! aliasing them onto a default, so an unexpected contract upgrade surfaces
//! as an error rather than a silently misread record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reputation tier assigned to a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Tier {
    /// No verified history yet.
    Unverified = 0,
    /// Entry tier.
    Bronze = 1,
    /// Established track record.
    Silver = 2,
    /// Strong track record.
    Gold = 3,
    /// Top-percentile agents.
    Platinum = 4,
    /// Highest tier.
    Diamond = 5,
}

impl Tier {
    /// Protocol-wide label for this tier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unverified => "UNVERIFIED",
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Diamond => "DIAMOND",
        }
    }

    /// Protocol fee discount granted to this tier, in percent.
    #[must_use]
    pub const fn discount_percent(self) -> u8 {
        match self {
            Self::Unverified => 0,
            Self::Bronze => 10,
            Self::Silver => 25,
            Self::Gold => 40,
            Self::Platinum => 60,
            Self::Diamond => 75,
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = UnknownTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unverified),
            1 => Ok(Self::Bronze),
            2 => Ok(Self::Silver),
            3 => Ok(Self::Gold),
            4 => Ok(Self::Platinum),
            5 => Ok(Self::Diamond),
            other => Err(UnknownTier(other)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(value: Tier) -> Self {
        value as Self
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tier value outside the contract's defined range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier value {0}")]
pub struct UnknownTier(pub u8);

/// How a registered service prices its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PricingModel {
    /// Flat price per request.
    PerRequest = 0,
    /// Price per token processed.
    PerToken = 1,
    /// Price per second of compute.
    PerSecond = 2,
    /// Price per byte processed.
    PerByte = 3,
    /// Recurring subscription.
    Subscription = 4,
    /// Negotiated out of band.
    Custom = 5,
}

impl PricingModel {
    /// Protocol-wide label for this pricing model.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PerRequest => "PER_REQUEST",
            Self::PerToken => "PER_TOKEN",
            Self::PerSecond => "PER_SECOND",
            Self::PerByte => "PER_BYTE",
            Self::Subscription => "SUBSCRIPTION",
            Self::Custom => "CUSTOM",
        }
    }
}

impl TryFrom<u8> for PricingModel {
    type Error = UnknownPricingModel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PerRequest),
            1 => Ok(Self::PerToken),
            2 => Ok(Self::PerSecond),
            3 => Ok(Self::PerByte),
            4 => Ok(Self::Subscription),
            5 => Ok(Self::Custom),
            other => Err(UnknownPricingModel(other)),
        }
    }
}

impl From<PricingModel> for u8 {
    fn from(value: PricingModel) -> Self {
        value as Self
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pricing model value outside the contract's defined range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown pricing model value {0}")]
pub struct UnknownPricingModel(pub u8);

/// Lifecycle state of a payment channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ChannelStatus {
    /// No channel exists between the pair.
    None = 0,
    /// Open and accepting off-chain updates.
    Open = 1,
    /// A unilateral close is in its challenge window.
    Closing = 2,
    /// Settled and closed.
    Closed = 3,
}

impl ChannelStatus {
    /// Protocol-wide label for this status.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Open => "OPEN",
            Self::Closing => "CLOSING",
            Self::Closed => "CLOSED",
        }
    }
}

impl TryFrom<u8> for ChannelStatus {
    type Error = UnknownChannelStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Open),
            2 => Ok(Self::Closing),
            3 => Ok(Self::Closed),
            other => Err(UnknownChannelStatus(other)),
        }
    }
}

impl From<ChannelStatus> for u8 {
    fn from(value: ChannelStatus) -> Self {
        value as Self
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A channel status value outside the contract's defined range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel status value {0}")]
pub struct UnknownChannelStatus(pub u8);

/// Well-known service categories.
///
/// The registry itself accepts arbitrary category strings; these are the
/// labels protocol tooling agrees on, so listings surface in searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ServiceCategory {
    LanguageModel,
    ImageGeneration,
    CodeGeneration,
    Translation,
    DataAnalysis,
    Reasoning,
    Embedding,
    Speech,
    Vision,
    Multimodal,
    Agent,
    Tool,
    Custom,
}

impl ServiceCategory {
    /// Every well-known category.
    pub const ALL: [Self; 13] = [
        Self::LanguageModel,
        Self::ImageGeneration,
        Self::CodeGeneration,
        Self::Translation,
        Self::DataAnalysis,
        Self::Reasoning,
        Self::Embedding,
        Self::Speech,
        Self::Vision,
        Self::Multimodal,
        Self::Agent,
        Self::Tool,
        Self::Custom,
    ];

    /// The registry-facing category string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LanguageModel => "language_model",
            Self::ImageGeneration => "image_generation",
            Self::CodeGeneration => "code_generation",
            Self::Translation => "translation",
            Self::DataAnalysis => "data_analysis",
            Self::Reasoning => "reasoning",
            Self::Embedding => "embedding",
            Self::Speech => "speech",
            Self::Vision => "vision",
            Self::Multimodal => "multimodal",
            Self::Agent => "agent",
            Self::Tool => "tool",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_u8_roundtrip() {
        for value in 0..=5u8 {
            let tier = Tier::try_from(value).unwrap();
            assert_eq!(u8::from(tier), value);
        }
    }

    #[test]
    fn test_tier_rejects_out_of_range() {
        assert_eq!(Tier::try_from(6), Err(UnknownTier(6)));
        assert_eq!(Tier::try_from(99), Err(UnknownTier(99)));
    }

    #[test]
    fn test_tier_discounts() {
        assert_eq!(Tier::Unverified.discount_percent(), 0);
        assert_eq!(Tier::Silver.discount_percent(), 25);
        assert_eq!(Tier::Diamond.discount_percent(), 75);
    }

    #[test]
    fn test_pricing_model_u8_roundtrip() {
        for value in 0..=5u8 {
            let model = PricingModel::try_from(value).unwrap();
            assert_eq!(u8::from(model), value);
        }
        assert!(PricingModel::try_from(6).is_err());
    }

    #[test]
    fn test_channel_status_u8_roundtrip() {
        for value in 0..=3u8 {
            let status = ChannelStatus::try_from(value).unwrap();
            assert_eq!(u8::from(status), value);
        }
        assert!(ChannelStatus::try_from(4).is_err());
    }

    #[test]
    fn test_names_match_protocol_labels() {
        assert_eq!(Tier::Gold.name(), "GOLD");
        assert_eq!(PricingModel::PerRequest.name(), "PER_REQUEST");
        assert_eq!(ChannelStatus::Closing.name(), "CLOSING");
        assert_eq!(ServiceCategory::LanguageModel.as_str(), "language_model");
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Tier::Bronze).unwrap(), "\"BRONZE\"");
        assert_eq!(
            serde_json::to_string(&ServiceCategory::CodeGeneration).unwrap(),
            "\"code_generation\""
        );
    }
}
