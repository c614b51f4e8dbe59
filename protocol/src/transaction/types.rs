//! Transaction envelope types.
//!
//! An envelope carries type-tagged messages, the fee and gas settings, one
//! signer info per signer, and the matching raw signatures. Messages are
//! stored as [`AnyMsg`] so a block builder can look at the type tag without
//! decoding the message body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::codec::CodecError;

/// Type URL of the pre-malleation blob message.
pub const URL_MSG_WIRE_PAY_FOR_BLOB: &str = "/tessera.blob.MsgWirePayForBlob";

/// Type URL of the canonical, payload-free blob message.
pub const URL_MSG_PAY_FOR_BLOB: &str = "/tessera.blob.MsgPayForBlob";

/// Type URL of a plain token transfer.
pub const URL_MSG_SEND: &str = "/tessera.bank.MsgSend";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A message that can be packed into an envelope.
pub trait Msg: Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;
}

/// A type-tagged, encoded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyMsg {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl AnyMsg {
    /// Encodes `msg` under its type URL.
    pub fn pack<M: Msg>(msg: &M) -> Result<Self, CodecError> {
        let value = bincode::serialize(msg).map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(Self {
            type_url: M::TYPE_URL.to_string(),
            value,
        })
    }

    /// Decodes the message, failing if the type URL does not match `M`.
    pub fn unpack<M: Msg>(&self) -> Result<M, CodecError> {
        if !self.is::<M>() {
            return Err(CodecError::TypeMismatch {
                expected: M::TYPE_URL.to_string(),
                got: self.type_url.clone(),
            });
        }
        bincode::deserialize(&self.value).map_err(|e| CodecError::Decode(e.to_string()))
    }

    pub fn is<M: Msg>(&self) -> bool {
        self.type_url == M::TYPE_URL
    }
}

/// A plain token transfer. Carries no blob and passes through malleation
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: u64,
}

impl Msg for MsgSend {
    const TYPE_URL: &'static str = URL_MSG_SEND;
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The part of a transaction all signers sign over.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxBody {
    pub messages: Vec<AnyMsg>,
    pub memo: String,
}

/// How a signer's signature bytes are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeInfo {
    Single,
    Multi { threshold: u32 },
}

/// Public key and replay protection for one signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub public_key: Vec<u8>,
    pub mode_info: ModeInfo,
    pub sequence: u64,
}

/// Fee, gas and signer metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthInfo {
    pub signer_infos: Vec<SignerInfo>,
    pub fee: u64,
    pub gas_limit: u64,
}

/// A full transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tx {
    pub body: TxBody,
    pub auth_info: AuthInfo,
    /// One entry per signer info. Multi-mode entries hold the bincode
    /// encoding of the individual signatures.
    pub signatures: Vec<Vec<u8>>,
}

impl Tx {
    pub fn messages(&self) -> &[AnyMsg] {
        &self.body.messages
    }

    pub fn memo(&self) -> &str {
        &self.body.memo
    }

    pub fn fee(&self) -> u64 {
        self.auth_info.fee
    }

    pub fn gas_limit(&self) -> u64 {
        self.auth_info.gas_limit
    }

    /// Pairs each signer info with its signature bytes.
    pub fn signatures_v2(&self) -> Result<Vec<SignatureV2>, CodecError> {
        if self.signatures.len() != self.auth_info.signer_infos.len() {
            return Err(CodecError::Decode(format!(
                "{} signatures for {} signer infos",
                self.signatures.len(),
                self.auth_info.signer_infos.len()
            )));
        }

        self.auth_info
            .signer_infos
            .iter()
            .zip(&self.signatures)
            .map(|(info, raw)| {
                let data = match info.mode_info {
                    ModeInfo::Single => SignatureData::Single {
                        signature: raw.clone(),
                    },
                    ModeInfo::Multi { .. } => SignatureData::Multi {
                        signatures: bincode::deserialize(raw)
                            .map_err(|e| CodecError::Decode(e.to_string()))?,
                    },
                };
                Ok(SignatureV2 {
                    public_key: info.public_key.clone(),
                    data,
                    sequence: info.sequence,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Signature bytes for one signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureData {
    Single { signature: Vec<u8> },
    Multi { signatures: Vec<Vec<u8>> },
}

/// A signer's public key, signature and sequence, as seen by verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureV2 {
    pub public_key: Vec<u8>,
    pub data: SignatureData,
    pub sequence: u64,
}

/// The document a signer signs: body, auth info and chain ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignDoc {
    pub body: TxBody,
    pub auth_info: AuthInfo,
    pub chain_id: String,
}

impl SignDoc {
    pub fn from_tx(tx: &Tx, chain_id: &str) -> Self {
        Self {
            body: tx.body.clone(),
            auth_info: tx.auth_info.clone(),
            chain_id: chain_id.to_string(),
        }
    }

    /// Canonical bytes to sign.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(|e| CodecError::Encode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MalleatedTx
// ---------------------------------------------------------------------------

/// A canonical transaction rewrapped with the share index its blob starts at.
///
/// `original_tx_hash` is the SHA-256 of the wire transaction it replaced, so
/// clients can track their submission through malleation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalleatedTx {
    pub original_tx_hash: [u8; 32],
    pub share_index: u32,
    pub tx: Vec<u8>,
}
