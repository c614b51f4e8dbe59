//! Envelope signing with Ed25519 keypairs.
//!
//! Signing is a separate step from building because the key may live
//! elsewhere (keyring, hardware wallet, remote signer). Signers implement
//! [`TxSigner`]; the blob module only ever talks to that trait.
//!
//! Signatures cover the bincode encoding of a [`SignDoc`]: body, auth info
//! and chain ID. The signature bytes themselves are not part of the
//! document, so a signature can be moved onto any envelope with an identical
//! body and auth info.

use thiserror::Error;

use super::builder::{TxBuilder, TxBuilderOption};
use super::codec::CodecError;
use super::types::{AnyMsg, ModeInfo, SignDoc, SignerInfo, Tx};
use crate::address::{Address, AddressError};
use crate::crypto::keys::{verify, Keypair};
use crate::namespace::NamespaceError;

/// Errors raised while producing or checking signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// The signer has no usable address.
    #[error("signer has no address")]
    NoAddress,

    /// The signed envelope does not carry exactly one signature.
    #[error("expected exactly one signature, got {0}")]
    UnexpectedSignerCount(usize),

    /// The signature does not use the single-signer scheme.
    #[error("signature is not a single-signer signature")]
    NotSingleSigner,

    /// The signature does not verify against the embedded public key.
    #[error("signature verification failed")]
    VerificationFailed,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}

// ---------------------------------------------------------------------------
// TxSigner
// ---------------------------------------------------------------------------

/// Signing capability consumed by the wire transaction model.
pub trait TxSigner {
    /// Account address of the signing identity, if it has one.
    fn address(&self) -> Option<Address>;

    fn chain_id(&self) -> &str;

    /// A fresh builder with `options` applied.
    fn new_tx_builder(&self, options: &[TxBuilderOption]) -> TxBuilder {
        TxBuilder::new().apply(options)
    }

    /// Adds `msg` to `builder` and returns the signed envelope.
    fn build_signed_tx(&self, builder: TxBuilder, msg: AnyMsg) -> Result<Tx, SignError>;
}

/// A signer backed by an in-memory Ed25519 keypair.
#[derive(Debug, Clone)]
pub struct KeyringSigner {
    keypair: Keypair,
    chain_id: String,
    sequence: u64,
}

impl KeyringSigner {
    pub fn new(keypair: Keypair, chain_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            keypair,
            chain_id: chain_id.into(),
            sequence,
        }
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Sets the account sequence used for the next envelope.
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }
}

impl TxSigner for KeyringSigner {
    fn address(&self) -> Option<Address> {
        Some(Address::from_public_key(&self.keypair.public_key_bytes()))
    }

    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    fn build_signed_tx(&self, builder: TxBuilder, msg: AnyMsg) -> Result<Tx, SignError> {
        let mut tx = builder
            .msg(msg)
            .signer_info(SignerInfo {
                public_key: self.keypair.public_key_bytes().to_vec(),
                mode_info: ModeInfo::Single,
                sequence: self.sequence,
            })
            .build();

        let sign_bytes = SignDoc::from_tx(&tx, &self.chain_id).sign_bytes()?;
        tx.signatures = vec![self.keypair.sign(&sign_bytes)];
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Checks a single-signer envelope against its embedded public key.
pub fn verify_tx_signature(tx: &Tx, chain_id: &str) -> Result<(), SignError> {
    let infos = &tx.auth_info.signer_infos;
    if infos.len() != 1 || tx.signatures.len() != 1 {
        return Err(SignError::UnexpectedSignerCount(tx.signatures.len()));
    }

    let info = &infos[0];
    if info.mode_info != ModeInfo::Single {
        return Err(SignError::NotSingleSigner);
    }

    let sign_bytes = SignDoc::from_tx(tx, chain_id).sign_bytes()?;
    if !verify(&info.public_key, &sign_bytes, &tx.signatures[0]) {
        return Err(SignError::VerificationFailed);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
