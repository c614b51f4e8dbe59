//! Error types for blob transactions.
//!
//! Admission checks return [`ValidationError`], envelope inspection returns
//! [`ExtractError`], and turning a signed wire message into its canonical
//! form returns [`MalleateError`].

use thiserror::Error;

use crate::address::AddressError;
use crate::namespace::NamespaceError;
use crate::transaction::CodecError;

/// Reasons a wire message is refused admission. The checks run in the order
/// the variants are listed and stop at the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid namespace: {0}")]
    Namespace(#[from] NamespaceError),

    #[error("invalid signer address: {0}")]
    Address(#[from] AddressError),

    /// The declared blob size does not match the carried blob.
    #[error("declared blob size {declared} does not match actual size {actual}")]
    SizeMismatch { declared: u64, actual: usize },

    /// The share commitment was not created from this namespace and blob.
    #[error("share commitment does not match namespace and blob")]
    BadCommitment,
}

/// Reasons a wire message cannot be pulled out of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The envelope carries no wire message.
    #[error("envelope does not contain a MsgWirePayForBlob")]
    NotFound,

    /// Only single-message envelopes can be malleated.
    #[error("envelope carries {count} messages, only single-message envelopes are supported")]
    MultipleMessagesUnsupported { count: usize },
}

/// Per-entry malleation failures. The pipeline drops the entry and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalleateError {
    /// The entry has a wire message but no decoded envelope to take fee and
    /// signer data from.
    #[error("wire message has no envelope")]
    MissingEnvelope,

    #[error("declared blob size {declared} does not match actual size {actual}")]
    SizeMismatch { declared: u64, actual: usize },

    /// The wire message carries no signature.
    #[error("wire message is not signed")]
    MissingSignature,

    /// The envelope does not carry exactly one signer.
    #[error("envelope has {0} signers, expected exactly one")]
    UnexpectedSignerCount(usize),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
