//! # Proposal Preparation
//!
//! Turns the raw transactions of a block proposal into the transaction list
//! and blob list of a square.
//!
//! ```text
//! parse.rs     raw bytes -> working set of ParsedTx
//! malleate.rs  Malleator::malleate_and_place
//! error.rs     PipelineError
//! ```
//!
//! [`prepare_proposal`] runs the whole pass: parse, pick a square width
//! from the estimated share demand, then malleate and place.

pub mod error;
pub mod malleate;
pub mod parse;

pub use error::PipelineError;
pub use malleate::{DroppedTx, Malleator, PreparedSquare};
pub use parse::{parse_txs, ParsedTx};

use tracing::debug;

use crate::block::{Blob, Evidence};
use crate::config::{ChainParams, MIN_SQUARE_SIZE};
use crate::shares::ShareAccounting;
use crate::square::min_square_size;
use crate::transaction::TxCodec;

/// Upper bound on the bytes a canonical transaction gains when wrapped with
/// its share index: tag, original hash, index and length prefix.
const WRAPPED_TX_OVERHEAD: usize = 4 + 32 + 4 + 8;

/// Estimates the square width for a working set.
///
/// Share demand is the compact shares of all transactions (blob
/// transactions counted at their malleated size) plus the blob shares. It is
/// doubled to leave room for alignment padding, then clamped to
/// `[MIN_SQUARE_SIZE, params.max_square_size]`.
pub fn estimate_square_size<A: ShareAccounting + ?Sized>(
    params: &ChainParams,
    accounting: &A,
    entries: &[ParsedTx],
    evidence: &[Evidence],
) -> usize {
    let mut tx_sizes = Vec::with_capacity(entries.len());
    let mut blob_shares = 0;

    for entry in entries {
        match &entry.wire {
            Some(wire) => {
                tx_sizes.push(
                    entry.raw_tx.len().saturating_sub(wire.blob.len()) + WRAPPED_TX_OVERHEAD,
                );
                let blob = Blob::new(wire.namespace_id.clone(), wire.blob.clone());
                blob_shares += accounting.blob_share_count(params, &blob);
            }
            None => tx_sizes.push(entry.raw_tx.len()),
        }
    }

    let compact_shares =
        accounting.compact_share_count(params, &tx_sizes, evidence, params.max_square_size);
    let total = compact_shares + blob_shares;
    // Unvalidated params may carry a zero maximum. `malleate_and_place`
    // rejects the width.
    let max = params.max_square_size.max(MIN_SQUARE_SIZE);
    let size = min_square_size(total * 2).clamp(MIN_SQUARE_SIZE, max);

    debug!(compact_shares, blob_shares, square_size = size, "estimated square size");
    size
}

/// Parses `raw_txs`, estimates the square width and runs the malleation
/// pipeline.
pub fn prepare_proposal<C, A>(
    params: &ChainParams,
    codec: &C,
    accounting: &A,
    raw_txs: &[Vec<u8>],
    evidence: &[Evidence],
) -> Result<PreparedSquare, PipelineError>
where
    C: TxCodec + ?Sized,
    A: ShareAccounting + ?Sized,
{
    let entries = parse_txs(codec, raw_txs)?;
    let square_size = estimate_square_size(params, accounting, &entries, evidence);
    Malleator::new(params, codec, accounting).malleate_and_place(entries, square_size, evidence)
}
