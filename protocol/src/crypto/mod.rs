//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around audited implementations:
//!
//! - **SHA-256** for share leaves, Merkle nodes, addresses and tx hashes.
//! - **Ed25519** for transaction signatures.
//!
//! Nothing here is novel. The share commitment built on top of these lives in
//! [`crate::commitment`].

pub mod hash;
pub mod keys;

pub use hash::{hash_inner, hash_leaf, merkle_root, sha256, sha256_array};
pub use keys::Keypair;
