use sha3::{Digest, Keccak256};
use thiserror::Error;

const ADDRESS_HEX_LEN: usize = 40;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must be {ADDRESS_HEX_LEN} hex digits, got {0}")]
    InvalidLength(usize),
    #[error("address contains a non-hex character")]
    NonHex,
    #[error("address checksum does not match")]
    BadChecksum,
}

/// Accepts an Ethereum account address in any of the forms wallets hand out.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase digits are
/// accepted as-is; mixed case is treated as an EIP-55 checksum and must match.
pub fn is_address(value: &str) -> bool {
    parse_address(value).is_ok()
}

/// Validates `value` and returns the canonical lowercase `0x`-prefixed form.
pub fn parse_address(value: &str) -> Result<String, AddressError> {
    let digits = strip_prefix(value);
    if digits.len() != ADDRESS_HEX_LEN {
        return Err(AddressError::InvalidLength(digits.len()));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::NonHex);
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && checksum_digits(digits) != digits {
        return Err(AddressError::BadChecksum);
    }

    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

/// EIP-55 mixed-case form of a valid address.
pub fn to_checksum_address(value: &str) -> Result<String, AddressError> {
    let canonical = parse_address(value)?;
    Ok(format!("0x{}", checksum_digits(strip_prefix(&canonical))))
}

/// Case-insensitive equality for two address strings, ignoring the `0x` prefix.
pub fn same_address(a: &str, b: &str) -> bool {
    strip_prefix(a.trim()).eq_ignore_ascii_case(strip_prefix(b.trim()))
}

fn strip_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

fn checksum_digits(digits: &str) -> String {
    let lower = digits.to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());

    let mut output = String::with_capacity(lower.len());
    for (index, ch) in lower.chars().enumerate() {
        let byte = hash[index / 2];
        let nibble = if index % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            output.push(ch.to_ascii_uppercase());
        } else {
            output.push(ch);
        }
    }
    output
}
