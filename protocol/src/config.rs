//! # Chain Parameters & Constants
//!
//! Every consensus-relevant magic number in Tessera lives here. Namespace
//! bounds, share geometry, address encoding: if two nodes disagree on any
//! of these, they will build different squares from the same mempool.
//!
//! The constants describe mainnet. Code never reads them directly though;
//! validators and planners take a [`ChainParams`] value so tests can run
//! the whole pipeline against synthetic parameter sets.

use bech32::Hrp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Width of every namespace ID in bytes.
pub const NAMESPACE_ID_SIZE: usize = 8;

/// Highest namespace reserved for protocol data. User blobs must sort
/// strictly above it.
pub const MAX_RESERVED_NAMESPACE: [u8; NAMESPACE_ID_SIZE] = [0, 0, 0, 0, 0, 0, 0, 0xFF];

/// Namespace of the compact shares holding block transactions.
pub const TX_NAMESPACE_ID: [u8; NAMESPACE_ID_SIZE] = [0, 0, 0, 0, 0, 0, 0, 0x01];

/// Namespace of the compact shares holding evidence.
pub const EVIDENCE_NAMESPACE_ID: [u8; NAMESPACE_ID_SIZE] = [0, 0, 0, 0, 0, 0, 0, 0x03];

/// Namespace of the erasure-coded parity shares.
pub const PARITY_SHARES_NAMESPACE_ID: [u8; NAMESPACE_ID_SIZE] = [0xFF; NAMESPACE_ID_SIZE];

/// Namespace used to pad the square after the last blob.
pub const TAIL_PADDING_NAMESPACE_ID: [u8; NAMESPACE_ID_SIZE] =
    [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE];

// ---------------------------------------------------------------------------
// Shares
// ---------------------------------------------------------------------------

/// Size of a single share in bytes.
pub const SHARE_SIZE: usize = 512;

/// The info byte following the namespace in every share: share version in
/// the upper seven bits, sequence-start flag in the lowest bit.
pub const SHARE_INFO_BYTES: usize = 1;

/// Current share format version.
pub const SHARE_VERSION: u8 = 0;

/// Reserved bytes in compact shares pointing at the first unit boundary.
pub const COMPACT_SHARE_RESERVED_BYTES: usize = 1;

/// Sequence length prefix carried by the first compact share of a namespace.
pub const SEQUENCE_LEN_BYTES: usize = 4;

/// Smallest square width the block builder will produce.
pub const MIN_SQUARE_SIZE: usize = 1;

/// Largest square width the block builder will produce.
pub const DEFAULT_MAX_SQUARE_SIZE: usize = 128;

// ---------------------------------------------------------------------------
// Addresses & Commitments
// ---------------------------------------------------------------------------

/// Bech32 human-readable prefix for account addresses.
pub const ADDRESS_HRP: &str = "tess";

/// Raw account address length: the first 20 bytes of SHA-256(pubkey).
pub const ADDRESS_LENGTH: usize = 20;

/// Share commitment length in bytes.
pub const COMMITMENT_LENGTH: usize = 32;

/// Chain ID used when nothing else is configured.
pub const DEFAULT_CHAIN_ID: &str = "tessera-devnet-1";

// ---------------------------------------------------------------------------
// ChainParams
// ---------------------------------------------------------------------------

/// Errors raised when a parameter set is internally inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A sentinel namespace does not match the configured namespace width.
    #[error("{name} namespace is {got} bytes, namespace_id_size is {want}")]
    SentinelWidth {
        name: &'static str,
        got: usize,
        want: usize,
    },

    /// The namespace width is zero.
    #[error("namespace_id_size must be non-zero")]
    ZeroNamespaceWidth,

    /// A share cannot hold its own header.
    #[error("share_size {share_size} leaves no room for content after a {header}-byte header")]
    ShareTooSmall { share_size: usize, header: usize },

    /// The maximum square size is not a power of two.
    #[error("max_square_size must be a non-zero power of two, got {0}")]
    MaxSquareSize(usize),

    /// The address prefix is not a valid bech32 HRP.
    #[error("invalid address hrp '{0}'")]
    AddressHrp(String),

    /// A parameter file could not be parsed.
    #[error("failed to parse chain params: {0}")]
    Parse(String),
}

/// Immutable chain-wide parameters threaded through every validator and
/// planner call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    pub chain_id: String,
    pub namespace_id_size: usize,
    pub max_reserved_namespace: Vec<u8>,
    pub parity_shares_namespace: Vec<u8>,
    pub tail_padding_namespace: Vec<u8>,
    pub tx_namespace: Vec<u8>,
    pub evidence_namespace: Vec<u8>,
    pub share_size: usize,
    pub compact_share_reserved_bytes: usize,
    pub sequence_len_bytes: usize,
    pub max_square_size: usize,
    pub address_hrp: String,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl ChainParams {
    /// The production parameter set.
    pub fn mainnet() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            namespace_id_size: NAMESPACE_ID_SIZE,
            max_reserved_namespace: MAX_RESERVED_NAMESPACE.to_vec(),
            parity_shares_namespace: PARITY_SHARES_NAMESPACE_ID.to_vec(),
            tail_padding_namespace: TAIL_PADDING_NAMESPACE_ID.to_vec(),
            tx_namespace: TX_NAMESPACE_ID.to_vec(),
            evidence_namespace: EVIDENCE_NAMESPACE_ID.to_vec(),
            share_size: SHARE_SIZE,
            compact_share_reserved_bytes: COMPACT_SHARE_RESERVED_BYTES,
            sequence_len_bytes: SEQUENCE_LEN_BYTES,
            max_square_size: DEFAULT_MAX_SQUARE_SIZE,
            address_hrp: ADDRESS_HRP.to_string(),
        }
    }

    /// Parses a JSON parameter set and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Checks that the parameter set describes a buildable square.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace_id_size == 0 {
            return Err(ConfigError::ZeroNamespaceWidth);
        }

        let sentinels: [(&'static str, &Vec<u8>); 5] = [
            ("max reserved", &self.max_reserved_namespace),
            ("parity shares", &self.parity_shares_namespace),
            ("tail padding", &self.tail_padding_namespace),
            ("tx", &self.tx_namespace),
            ("evidence", &self.evidence_namespace),
        ];
        for (name, ns) in sentinels {
            if ns.len() != self.namespace_id_size {
                return Err(ConfigError::SentinelWidth {
                    name,
                    got: ns.len(),
                    want: self.namespace_id_size,
                });
            }
        }

        let header = self.namespace_id_size
            + SHARE_INFO_BYTES
            + self.sequence_len_bytes
            + self.compact_share_reserved_bytes;
        if self.share_size <= header {
            return Err(ConfigError::ShareTooSmall {
                share_size: self.share_size,
                header,
            });
        }

        if !self.max_square_size.is_power_of_two() {
            return Err(ConfigError::MaxSquareSize(self.max_square_size));
        }

        Hrp::parse(&self.address_hrp).map_err(|_| ConfigError::AddressHrp(self.address_hrp.clone()))?;
        Ok(())
    }

    /// Blob bytes carried by one sparse share.
    pub fn sparse_share_content_size(&self) -> usize {
        self.share_size - self.namespace_id_size - SHARE_INFO_BYTES
    }

    /// Unit bytes carried by the first compact share of a namespace.
    pub fn first_compact_share_content_size(&self) -> usize {
        self.share_size
            - self.namespace_id_size
            - SHARE_INFO_BYTES
            - self.sequence_len_bytes
            - self.compact_share_reserved_bytes
    }

    /// Unit bytes carried by every later compact share of a namespace.
    pub fn continuation_compact_share_content_size(&self) -> usize {
        self.share_size
            - self.namespace_id_size
            - SHARE_INFO_BYTES
            - self.compact_share_reserved_bytes
    }
}
