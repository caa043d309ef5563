//! Address parsing with EIP-55 checksum validation.
//!
//! Everything downstream of this module works with the parsed
//! [`Address`] type, so a string that fails here never reaches a hash
//! function or a contract call.

use alloy_primitives::Address;

/// Error returned when parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAddressError {
    /// Not a `0x`-prefixed 40-digit hex string.
    #[error("malformed address {0:?}")]
    Malformed(String),
    /// Mixed-case hex whose capitalization fails the EIP-55 checksum.
    #[error("address {0:?} fails its EIP-55 checksum")]
    Checksum(String),
}

/// Parses a `0x`-prefixed address string.
///
/// All-lowercase and all-uppercase inputs carry no checksum and are accepted
/// as plain hex. Mixed-case inputs are treated as checksummed and the EIP-55
/// capitalization is enforced, so a typo in a checksummed address is caught
/// here rather than sending funds to the wrong account.
///
/// # Errors
///
/// [`ParseAddressError::Malformed`] for anything that is not 20 bytes of
/// `0x`-prefixed hex; [`ParseAddressError::Checksum`] for a mixed-case
/// string with the wrong capitalization.
pub fn parse_address(s: &str) -> Result<Address, ParseAddressError> {
    let malformed = || ParseAddressError::Malformed(s.to_owned());
    let hex = s.strip_prefix("0x").ok_or_else(malformed)?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower {
        Address::parse_checksummed(s, None).map_err(|_| ParseAddressError::Checksum(s.to_owned()))
    } else {
        s.parse().map_err(|_| malformed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Checksummed example address from EIP-55.
    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_accepts_checksummed() {
        assert!(parse_address(CHECKSUMMED).is_ok());
    }

    #[test]
    fn test_accepts_lowercase() {
        let lower = CHECKSUMMED.to_lowercase();
        assert_eq!(parse_address(&lower).unwrap(), parse_address(CHECKSUMMED).unwrap());
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // Lowercase the first checksummed 'A'.
        let bad = CHECKSUMMED.replacen('A', "a", 1);
        assert_eq!(
            parse_address(&bad),
            Err(ParseAddressError::Checksum(bad.clone()))
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for s in [
            "",
            "0x",
            "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAe",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAedFF",
            "0xzzzeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        ] {
            assert!(
                matches!(parse_address(s), Err(ParseAddressError::Malformed(_))),
                "{s:?} should be malformed"
            );
        }
    }
}
