use std::{fmt, str::FromStr};

use primitive_types::H160;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque 20-byte account identifier.
///
/// [`Address::ZERO`] means "no account". It is only ever the origin of minted
/// tokens and can never hold a balance, send, receive or approve.
/// Serialized as `0x`-prefixed hex.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Address(H160);

#[derive(Debug, Error, PartialEq)]
pub enum ParseAddressError {
    #[error("Address is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl Address {
    pub const ZERO: Address = Address(H160([0u8; 20]));

    /// Builds an address whose last 8 bytes hold `value`, big-endian.
    pub fn from_low_u64(value: u64) -> Self {
        Self(H160::from_low_u64_be(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)?;
        let bytes: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Ok(Self::from(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}
