//! Fixed-point token amount conversion.
//!
//! SYNX amounts exist in two representations: the *display* form users see
//! (`"10.5"`) and the *wire* form the contracts consume (the same value
//! scaled by 10^18 into an unsigned 256-bit integer). [`TokenAmount`] owns
//! the wire form and converts between the two without ever touching floating
//! point, so no value representable on the wire loses precision in either
//! direction.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Number of fractional decimal digits carried by the wire representation.
pub const DECIMALS: u32 = 18;

/// Scaling factor between display and wire form (10^18).
const SCALE: U256 = U256::from_limbs([10u64.pow(DECIMALS), 0, 0, 0]);

/// A SYNX token amount, held in its wire (18-decimal fixed-point) form.
///
/// Parsing from a display string is exact and rejects anything the wire form
/// cannot carry: negative values, more than 18 fractional digits, and values
/// past the `uint256` ceiling. [`fmt::Display`] renders the canonical decimal
/// (fractional trailing zeros trimmed), and the two directions round-trip:
/// formatting any wire value and parsing it back yields the same integer.
///
/// # Serialization
///
/// Serializes to/from the display string: `"10.5"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(U256);

impl TokenAmount {
    /// Zero tokens.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wraps an already-scaled wire value.
    #[must_use]
    pub const fn from_wire(wire: U256) -> Self {
        Self(wire)
    }

    /// Returns the wire-form integer the contracts consume.
    #[must_use]
    pub const fn wire(self) -> U256 {
        self.0
    }

    /// Whether this amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

/// Error returned when parsing a display amount string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Input was empty or contained a non-decimal character.
    #[error("malformed amount {0:?}")]
    Malformed(String),
    /// Negative amounts have no wire representation.
    #[error("negative amount {0:?}")]
    Negative(String),
    /// More fractional digits than the wire form carries. The excess is
    /// rejected, never truncated.
    #[error("amount {0:?} has more than {DECIMALS} fractional digits")]
    Precision(String),
    /// The scaled value does not fit in 256 bits.
    #[error("amount {0:?} overflows the wire representation")]
    Overflow(String),
}

impl FromStr for TokenAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('-') {
            return Err(AmountError::Negative(s.to_owned()));
        }
        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Malformed(s.to_owned()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::Malformed(s.to_owned()));
        }
        if frac_part.len() > DECIMALS as usize {
            return Err(AmountError::Precision(s.to_owned()));
        }

        let overflow = || AmountError::Overflow(s.to_owned());
        let ten = U256::from(10u64);
        let mut whole = U256::ZERO;
        for b in int_part.bytes() {
            whole = whole
                .checked_mul(ten)
                .and_then(|w| w.checked_add(U256::from(u64::from(b - b'0'))))
                .ok_or_else(overflow)?;
        }
        let mut wire = whole.checked_mul(SCALE).ok_or_else(overflow)?;

        // Fractional digits, right-padded to 18 places. Strictly below 10^18,
        // so this loop cannot overflow.
        let mut frac = U256::ZERO;
        for b in frac_part.bytes() {
            frac = frac * ten + U256::from(u64::from(b - b'0'));
        }
        for _ in frac_part.len()..DECIMALS as usize {
            frac *= ten;
        }
        wire = wire.checked_add(frac).ok_or_else(overflow)?;
        Ok(Self(wire))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.0.div_rem(SCALE);
        if frac.is_zero() {
            return write!(f, "{whole}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl From<TokenAmount> for U256 {
    fn from(value: TokenAmount) -> Self {
        value.0
    }
}

impl Serialize for TokenAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TokenAmount {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_scales_by_eighteen_decimals() {
        assert_eq!(
            parse("10.5").wire(),
            U256::from(10_500_000_000_000_000_000_u128)
        );
        assert_eq!(parse("1").wire(), U256::from(10_u128.pow(18)));
        assert_eq!(parse("0.000000000000000001").wire(), U256::from(1u64));
    }

    #[test]
    fn test_display_renders_canonical_decimal() {
        assert_eq!(
            TokenAmount::from_wire(U256::from(10_500_000_000_000_000_000_u128)).to_string(),
            "10.5"
        );
        assert_eq!(TokenAmount::from_wire(U256::from(1u64)).to_string(), "0.000000000000000001");
        assert_eq!(TokenAmount::ZERO.to_string(), "0");
    }

    #[test]
    fn test_display_roundtrip() {
        for s in [
            "0",
            "1",
            "10.5",
            "0.000000000000000001",
            "123456789.987654321",
            "999999999999999999999999999999.999999999999999999",
        ] {
            assert_eq!(parse(s).to_string(), s, "display form {s} did not round-trip");
        }
    }

    #[test]
    fn test_wire_roundtrip() {
        for wire in [
            U256::ZERO,
            U256::from(1u64),
            U256::from(10_u128.pow(18)),
            U256::from(10_u128.pow(18) - 1),
            U256::MAX,
        ] {
            let display = TokenAmount::from_wire(wire).to_string();
            assert_eq!(parse(&display).wire(), wire, "wire value {wire} did not round-trip");
        }
    }

    #[test]
    fn test_non_canonical_forms_parse() {
        assert_eq!(parse("007.5"), parse("7.5"));
        assert_eq!(parse(".5"), parse("0.5"));
        assert_eq!(parse("5."), parse("5"));
        assert_eq!(parse("0.0"), TokenAmount::ZERO);
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!("-1".parse::<TokenAmount>(), Err(AmountError::Negative(_))));
        assert!(matches!("-0".parse::<TokenAmount>(), Err(AmountError::Negative(_))));
    }

    #[test]
    fn test_rejects_excess_fractional_digits() {
        // 19 fractional digits: one past the wire resolution.
        assert!(matches!(
            "1.1234567890123456789".parse::<TokenAmount>(),
            Err(AmountError::Precision(_))
        ));
        // Even trailing zeros past the boundary are refused, not trimmed.
        assert!(matches!(
            "1.0000000000000000000".parse::<TokenAmount>(),
            Err(AmountError::Precision(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        for s in ["", ".", "1.2.3", "1e5", "0x10", "ten", "1 0", "+1"] {
            assert!(
                matches!(s.parse::<TokenAmount>(), Err(AmountError::Malformed(_))),
                "{s:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        let too_big = "9".repeat(78);
        assert!(matches!(too_big.parse::<TokenAmount>(), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn test_serde_uses_display_form() {
        let amount = parse("10.5");
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"10.5\"");
        let back: TokenAmount = serde_json::from_str("\"10.5\"").unwrap();
        assert_eq!(back, amount);
    }
}
