//! # Share Commitments
//!
//! A share commitment binds a blob's bytes to its namespace without saying
//! anything about where the blob will land in the square. It is computed
//! from the blob's sparse shares:
//!
//! ```text
//! shares  = sparse_shares(namespace, data)
//! leaves  = H_leaf(share) for each share
//! k       = min_square_size_for_message(len(data))
//! roots   = merkle_root(leaves[i..i+k]) for each chunk of k leaves
//! commit  = merkle_root(roots)
//! ```
//!
//! Because `k` depends only on the blob length, and non-interactive default
//! placement aligns the blob to the same power of two, the subtree roots are
//! exactly the roots a light client finds in the square. Malleation never
//! calls into this module; validation does.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ChainParams, COMMITMENT_LENGTH};
use crate::crypto::hash::{hash_leaf, merkle_root};
use crate::namespace::NamespaceId;
use crate::shares::sparse_shares;
use crate::square::min_square_size_for_message;

/// A 32-byte digest bound to exactly one `(namespace, data)` pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareCommitment([u8; COMMITMENT_LENGTH]);

impl ShareCommitment {
    pub fn from_bytes(bytes: [u8; COMMITMENT_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for ShareCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareCommitment({})", hex::encode(self.0))
    }
}

impl fmt::Display for ShareCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Computes the commitment for `data` under `namespace`. Pure and total.
pub fn create_commitment(params: &ChainParams, namespace: &NamespaceId, data: &[u8]) -> ShareCommitment {
    let leaves: Vec<[u8; 32]> = sparse_shares(params, namespace, data)
        .iter()
        .map(|share| hash_leaf(share))
        .collect();

    let subtree_width = min_square_size_for_message(params, data.len());
    let subtree_roots: Vec<[u8; 32]> = leaves.chunks(subtree_width).map(merkle_root).collect();

    ShareCommitment(merkle_root(&subtree_roots))
}

/// Returns `true` iff `commitment` was created from exactly this pair.
pub fn verify_commitment(
    params: &ChainParams,
    namespace: &NamespaceId,
    data: &[u8],
    commitment: &ShareCommitment,
) -> bool {
    create_commitment(params, namespace, data) == *commitment
}
