// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera Protocol: Core Library
//!
//! Tessera is a data-availability chain: users pay to publish namespaced
//! blobs, and every block lays those blobs out in a square of shares that
//! light clients can sample.
//!
//! This crate is the part of the block builder that turns blob transactions
//! into a square. A user submits a wire transaction carrying the blob, a
//! share commitment and a signature over the transaction it will become.
//! The builder malleates it into a blob-free canonical transaction, sorts
//! the blobs by namespace, places each one at a position every node can
//! recompute, and tags the canonical transaction with that position.
//!
//! ## Architecture
//!
//! - **config**: Chain constants and the [`ChainParams`] value threaded
//!   through every call.
//! - **crypto**: SHA-256, Merkle roots and Ed25519 keys.
//! - **namespace** / **address**: Identifier validation.
//! - **commitment**: Share commitments binding a blob to its namespace.
//! - **shares** / **square**: Share counting, placement and square sizing.
//! - **transaction**: Envelope, codec, builder and signer.
//! - **blob**: Wire and canonical blob messages.
//! - **proposal**: The malleate-and-place pipeline.

pub mod address;
pub mod blob;
pub mod block;
pub mod commitment;
pub mod config;
pub mod crypto;
pub mod namespace;
pub mod proposal;
pub mod shares;
pub mod square;
pub mod transaction;

pub use config::ChainParams;
