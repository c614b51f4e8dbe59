//! Blob message types.
//!
//! [`MsgWirePayForBlob`] is what users submit: the blob, its declared size,
//! its share commitment and a signature. [`MsgPayForBlob`] is what ends up
//! on chain after malleation: the same metadata without the blob.
//!
//! The wire message moves through two states. [`Unsigned`] is the result
//! of the commit phase; only [`Signed`] messages can be validated, packed
//! into an envelope or malleated.

use serde::{Deserialize, Serialize};

use crate::commitment::ShareCommitment;
use crate::namespace::NamespaceId;
use crate::transaction::{Msg, URL_MSG_PAY_FOR_BLOB, URL_MSG_WIRE_PAY_FOR_BLOB};

/// Commit phase done, no signer yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unsigned;

/// Signer address and the signature over the future canonical transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed {
    pub signer: String,
    pub signature: Vec<u8>,
}

/// The pre-malleation blob message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWirePayForBlob<S = Signed> {
    pub namespace_id: NamespaceId,
    pub blob_size: u64,
    pub blob: Vec<u8>,
    pub share_commitment: ShareCommitment,
    pub signing: S,
}

impl Msg for MsgWirePayForBlob<Signed> {
    const TYPE_URL: &'static str = URL_MSG_WIRE_PAY_FOR_BLOB;
}

impl MsgWirePayForBlob<Signed> {
    pub fn signer(&self) -> &str {
        &self.signing.signer
    }

    pub fn signature(&self) -> &[u8] {
        &self.signing.signature
    }
}

/// The canonical, payload-free blob message included on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgPayForBlob {
    pub namespace_id: NamespaceId,
    pub blob_size: u64,
    pub share_commitment: ShareCommitment,
    pub signer: String,
}

impl Msg for MsgPayForBlob {
    const TYPE_URL: &'static str = URL_MSG_PAY_FOR_BLOB;
}
