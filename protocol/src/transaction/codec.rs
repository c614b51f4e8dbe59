//! Transaction encoding.
//!
//! The block builder never assumes a wire format; it goes through
//! [`TxCodec`]. [`BincodeCodec`] is the format Tessera nodes speak: a
//! four-byte tag followed by the bincode encoding, so a plain transaction
//! and a rewrapped one can never be mistaken for each other.

use thiserror::Error;

use super::types::{MalleatedTx, Tx};

/// Tag prefixed to encoded transactions.
const TX_TAG: [u8; 4] = *b"TSX1";

/// Tag prefixed to encoded malleated transactions.
const MALLEATED_TX_TAG: [u8; 4] = *b"MTX1";

/// Errors raised while encoding or decoding transactions and messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("unexpected message type: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
}

/// Encoding capability consumed by the block builder.
pub trait TxCodec: Send + Sync {
    fn encode_tx(&self, tx: &Tx) -> Result<Vec<u8>, CodecError>;

    fn decode_tx(&self, raw: &[u8]) -> Result<Tx, CodecError>;

    fn encode_malleated(&self, tx: &MalleatedTx) -> Result<Vec<u8>, CodecError>;

    fn decode_malleated(&self, raw: &[u8]) -> Result<MalleatedTx, CodecError>;
}

/// Tagged bincode encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    fn encode_tagged<T: serde::Serialize>(tag: [u8; 4], value: &T) -> Result<Vec<u8>, CodecError> {
        let body = bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))?;
        let mut out = Vec::with_capacity(tag.len() + body.len());
        out.extend_from_slice(&tag);
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn decode_tagged<T: serde::de::DeserializeOwned>(
        tag: [u8; 4],
        raw: &[u8],
    ) -> Result<T, CodecError> {
        let body = raw
            .strip_prefix(&tag[..])
            .ok_or_else(|| CodecError::Decode("unknown transaction tag".to_string()))?;
        bincode::deserialize(body).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

impl TxCodec for BincodeCodec {
    fn encode_tx(&self, tx: &Tx) -> Result<Vec<u8>, CodecError> {
        Self::encode_tagged(TX_TAG, tx)
    }

    fn decode_tx(&self, raw: &[u8]) -> Result<Tx, CodecError> {
        Self::decode_tagged(TX_TAG, raw)
    }

    fn encode_malleated(&self, tx: &MalleatedTx) -> Result<Vec<u8>, CodecError> {
        Self::encode_tagged(MALLEATED_TX_TAG, tx)
    }

    fn decode_malleated(&self, raw: &[u8]) -> Result<MalleatedTx, CodecError> {
        Self::decode_tagged(MALLEATED_TX_TAG, raw)
    }
}

/// Wraps an encoded canonical transaction with its blob's share index.
pub fn wrap_malleated_tx<C: TxCodec + ?Sized>(
    codec: &C,
    original_tx_hash: [u8; 32],
    share_index: u32,
    tx: Vec<u8>,
) -> Result<Vec<u8>, CodecError> {
    codec.encode_malleated(&MalleatedTx {
        original_tx_hash,
        share_index,
        tx,
    })
}

/// Returns the malleated form of `raw`, or `None` for any other bytes.
pub fn unwrap_malleated_tx<C: TxCodec + ?Sized>(codec: &C, raw: &[u8]) -> Option<MalleatedTx> {
    codec.decode_malleated(raw).ok()
}
