//! Working-set construction.
//!
//! Every raw transaction of a proposal becomes one [`ParsedTx`], in
//! submission order. Entries are never removed here; an entry the pipeline
//! cannot use simply has no wire message and passes through as raw bytes.

use tracing::debug;

use super::error::PipelineError;
use crate::blob::{extract_wire_payload, has_wire_payload, ExtractError, MsgWirePayForBlob};
use crate::transaction::{Tx, TxCodec};

/// One entry of the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTx {
    /// Position in the submitted transaction list.
    pub slot: usize,
    pub raw_tx: Vec<u8>,
    /// Decoded envelope, if the bytes decode.
    pub tx: Option<Tx>,
    /// Wire message carried by the envelope, if any.
    pub wire: Option<MsgWirePayForBlob>,
    /// Rewrapped canonical transaction, set once the blob has been placed.
    pub malleated_tx: Option<Vec<u8>>,
}

impl ParsedTx {
    /// An entry for bytes that are passed through untouched.
    pub fn plain(slot: usize, raw_tx: Vec<u8>) -> Self {
        Self {
            slot,
            raw_tx,
            tx: None,
            wire: None,
            malleated_tx: None,
        }
    }

    pub fn has_wire(&self) -> bool {
        self.wire.is_some()
    }

    /// Bytes this entry contributes to the block.
    pub fn final_bytes(&self) -> &[u8] {
        self.malleated_tx.as_deref().unwrap_or(&self.raw_tx)
    }
}

/// Decodes raw transactions into the working set.
///
/// Undecodable transactions and transactions without a wire message become
/// plain entries. A wire message in a multi-message envelope aborts the pass.
pub fn parse_txs<C: TxCodec + ?Sized>(
    codec: &C,
    raw_txs: &[Vec<u8>],
) -> Result<Vec<ParsedTx>, PipelineError> {
    let mut parsed = Vec::with_capacity(raw_txs.len());

    for (slot, raw) in raw_txs.iter().enumerate() {
        let tx = match codec.decode_tx(raw) {
            Ok(tx) => tx,
            Err(err) => {
                debug!(slot, error = %err, "undecodable transaction passed through");
                parsed.push(ParsedTx::plain(slot, raw.clone()));
                continue;
            }
        };

        let wire = if has_wire_payload(&tx) {
            match extract_wire_payload(&tx) {
                Ok(wire) => Some(wire),
                Err(ExtractError::NotFound) => None,
                Err(source) => return Err(PipelineError::Extract { slot, source }),
            }
        } else {
            None
        };

        parsed.push(ParsedTx {
            slot,
            raw_tx: raw.clone(),
            tx: Some(tx),
            wire,
            malleated_tx: None,
        });
    }

    Ok(parsed)
}
