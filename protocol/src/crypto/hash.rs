//! # Hashing Utilities
//!
//! SHA-256 and the binary Merkle tree used by share commitments.
//!
//! The tree follows RFC 6962: leaves and inner nodes are hashed under
//! distinct one-byte prefixes so a leaf can never be passed off as an inner
//! node, and an unbalanced level splits at the largest power of two strictly
//! below its width instead of duplicating the last element.

use sha2::{Digest, Sha256};

/// Domain prefix for leaf hashes.
const LEAF_PREFIX: u8 = 0x00;

/// Domain prefix for inner node hashes.
const INNER_PREFIX: u8 = 0x01;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use tessera_protocol::crypto::sha256;
///
/// let hash = sha256(b"tessera");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    sha256_array(data).to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a Merkle leaf: `SHA-256(0x00 || data)`.
pub fn hash_leaf(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash two child nodes: `SHA-256(0x01 || left || right)`.
pub fn hash_inner(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Compute the Merkle root over already-hashed leaves.
///
/// The root of an empty tree is `SHA-256("")`; the root of a single leaf is
/// the leaf itself.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    match leaves.len() {
        0 => sha256_array(&[]),
        1 => leaves[0],
        n => {
            let split = split_point(n);
            let left = merkle_root(&leaves[..split]);
            let right = merkle_root(&leaves[split..]);
            hash_inner(&left, &right)
        }
    }
}

/// Largest power of two strictly less than `n`. Requires `n >= 2`.
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_sha256_array_matches_vec() {
        assert_eq!(sha256(b"test data").as_slice(), sha256_array(b"test data").as_slice());
    }

    #[test]
    fn leaf_and_inner_hashes_are_domain_separated() {
        let data = [7u8; 64];
        let mut left = [0u8; 32];
        let mut right = [0u8; 32];
        left.copy_from_slice(&data[..32]);
        right.copy_from_slice(&data[32..]);
        assert_ne!(hash_leaf(&data), hash_inner(&left, &right));
        assert_ne!(hash_leaf(&data), sha256_array(&data));
    }

    #[test]
    fn test_merkle_root_empty_and_single() {
        assert_eq!(merkle_root(&[]), sha256_array(b""));
        let leaf = hash_leaf(b"only child");
        assert_eq!(merkle_root(&[leaf]), leaf);
    }

    #[test]
    fn test_merkle_root_three_leaves_splits_left_heavy() {
        let a = hash_leaf(b"a");
        let b = hash_leaf(b"b");
        let c = hash_leaf(b"c");
        let expected = hash_inner(&hash_inner(&a, &b), &c);
        assert_eq!(merkle_root(&[a, b, c]), expected);
    }

    #[test]
    fn test_merkle_root_order_matters() {
        let a = hash_leaf(b"first");
        let b = hash_leaf(b"second");
        assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
    }

    #[test]
    fn split_point_is_largest_power_below() {
        assert_eq!(split_point(2), 1);
        assert_eq!(split_point(3), 2);
        assert_eq!(split_point(4), 2);
        assert_eq!(split_point(5), 4);
        assert_eq!(split_point(9), 8);
    }
}
