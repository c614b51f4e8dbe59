//! Namespace IDs and their legality rules.
//!
//! A namespace partitions the square so light clients can fetch only the
//! blobs they care about. Construction only checks the width; whether a
//! namespace may carry user blobs is decided by [`validate_namespace`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ChainParams;

/// Reasons a namespace ID cannot carry a user blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    #[error("invalid namespace length: got {got} want {want}")]
    WrongLength { got: usize, want: usize },

    #[error("reserved namespace: got {namespace}, want > {max_reserved}")]
    Reserved {
        namespace: String,
        max_reserved: String,
    },

    #[error("cannot use parity shares namespace ID")]
    ParityNamespace,

    #[error("cannot use tail padding namespace ID")]
    TailPaddingNamespace,
}

/// A fixed-width namespace identifier. Ordering is byte-lexicographic.
///
/// Only [`NamespaceId::new`] checks the width. An ID obtained by
/// deserialization is unchecked until [`NamespaceId::validate`] runs, which
/// admission does through `validate_basic`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(Vec<u8>);

impl NamespaceId {
    /// Builds a namespace ID, checking only that its width matches the chain.
    pub fn new(params: &ChainParams, bytes: &[u8]) -> Result<Self, NamespaceError> {
        check_width(params, bytes)?;
        Ok(Self(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full legality check, see [`validate_namespace`].
    pub fn validate(&self, params: &ChainParams) -> Result<(), NamespaceError> {
        validate_namespace(params, &self.0)
    }
}

impl AsRef<[u8]> for NamespaceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespaceId({})", hex::encode(&self.0))
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

fn check_width(params: &ChainParams, ns: &[u8]) -> Result<(), NamespaceError> {
    if ns.len() != params.namespace_id_size {
        return Err(NamespaceError::WrongLength {
            got: ns.len(),
            want: params.namespace_id_size,
        });
    }
    Ok(())
}

/// Returns an error if `ns` has the wrong width or falls in a range that user
/// blobs may not occupy: the reserved range (inclusive of its maximum), the
/// parity shares namespace, or the tail padding namespace.
pub fn validate_namespace(params: &ChainParams, ns: &[u8]) -> Result<(), NamespaceError> {
    check_width(params, ns)?;

    if ns <= params.max_reserved_namespace.as_slice() {
        return Err(NamespaceError::Reserved {
            namespace: hex::encode(ns),
            max_reserved: hex::encode(&params.max_reserved_namespace),
        });
    }

    if ns == params.parity_shares_namespace.as_slice() {
        return Err(NamespaceError::ParityNamespace);
    }

    if ns == params.tail_padding_namespace.as_slice() {
        return Err(NamespaceError::TailPaddingNamespace);
    }

    Ok(())
}
