//! # Account Addresses
//!
//! A Tessera address is the first 20 bytes of `SHA-256(public_key)`,
//! Bech32-encoded under the chain's human-readable prefix:
//!
//! ```text
//! public_key (32 bytes)
//!     -> SHA-256(public_key)[..20]
//!     -> Bech32("tess", hash) -> tess1qw508d6qe...
//! ```

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{ChainParams, ADDRESS_LENGTH};
use crate::crypto::hash::sha256_array;

/// Errors that can occur while parsing or rendering an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The decoded address has an unexpected human-readable prefix.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    /// The decoded data has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },
}

/// A raw account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Derives the address controlled by an Ed25519 public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        let digest = sha256_array(public_key);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// An all-zero address is never produced by a real key and is treated as
    /// "no address".
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Encodes the address under `hrp`.
    pub fn to_bech32(&self, hrp: &str) -> Result<String, AddressError> {
        let hrp = parse_hrp(hrp)?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| AddressError::Bech32Decode(e.to_string()))
    }

    /// Parses a Bech32 address, checking prefix, checksum and length.
    pub fn from_bech32(addr: &str, hrp: &str) -> Result<Self, AddressError> {
        let expected = parse_hrp(hrp)?;
        let (got, data) =
            bech32::decode(addr).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        if got != expected {
            return Err(AddressError::InvalidHrp {
                expected: hrp.to_string(),
                got: got.to_string(),
            });
        }

        let bytes: [u8; ADDRESS_LENGTH] =
            data.as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidDataLength {
                    expected: ADDRESS_LENGTH,
                    got: data.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

fn parse_hrp(hrp: &str) -> Result<Hrp, AddressError> {
    Hrp::parse(hrp).map_err(|_| AddressError::InvalidHrp {
        expected: "a valid bech32 prefix".to_string(),
        got: hrp.to_string(),
    })
}

/// Checks that `s` is a well-formed address on this chain.
pub fn validate_address(params: &ChainParams, s: &str) -> Result<Address, AddressError> {
    Address::from_bech32(s, &params.address_hrp)
}
