//! # Malleation & Blob Placement
//!
//! Turns a working set of parsed transactions into the transaction list and
//! blob list of a square.
//!
//! ```text
//! 1. MALLEATE  wire message -> canonical tx + blob + carried signature
//! 2. TRACK     tag each blob with the arena slot it came from
//! 3. ORDER     stable sort of the tagged blobs by namespace
//! 4. SPLIT     blobs | arena slots, same order
//! 5. MEASURE   compact shares for txs + evidence, shares per blob
//! 6. PLACE     non-interactive default start index per blob
//! 7. REWRAP    canonical tx + share index -> MalleatedTx bytes
//! 8. ASSEMBLE  txs in submission order, blobs in namespace order
//! ```
//!
//! A failure in step 1 drops that entry from the square and is reported in
//! [`PreparedSquare::dropped`]. Any failure from step 5 on aborts the pass.
//! With the `parallel` feature, step 1 runs on the rayon thread pool; the
//! output is identical to the sequential path.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::error::PipelineError;
use super::parse::ParsedTx;
use crate::blob::{process_wire_pay_for_blob, MalleateError, MsgWirePayForBlob};
use crate::block::{Blob, Evidence};
use crate::config::ChainParams;
use crate::crypto::hash::sha256_array;
use crate::shares::ShareAccounting;
use crate::transaction::{
    wrap_malleated_tx, AnyMsg, SignatureData, SignatureV2, TxBuilder, TxCodec,
};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A working-set entry that was left out of the square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedTx {
    pub slot: usize,
    pub reason: MalleateError,
}

/// The transactions and blobs of one square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSquare {
    /// Final transaction bytes in submission order.
    pub txs: Vec<Vec<u8>>,
    /// Blobs in namespace order.
    pub blobs: Vec<Blob>,
    /// Entries whose malleation failed. Diagnostic only.
    pub dropped: Vec<DroppedTx>,
    /// Compact shares used by transactions and evidence.
    pub compact_shares: usize,
    pub square_size: usize,
}

/// A canonical transaction waiting for its share index.
#[derive(Debug)]
struct Malleated {
    original_tx_hash: [u8; 32],
    canonical_tx: Vec<u8>,
    blob: Blob,
}

/// An arena slot: a retained entry and, for blob transactions, its
/// malleated form.
struct Retained {
    entry: ParsedTx,
    malleated: Option<Malleated>,
}

// ---------------------------------------------------------------------------
// Malleator
// ---------------------------------------------------------------------------

/// Runs the malleation pipeline against a fixed parameter set, codec and
/// share layout.
pub struct Malleator<'a, C: TxCodec + ?Sized, A: ShareAccounting + ?Sized> {
    params: &'a ChainParams,
    codec: &'a C,
    accounting: &'a A,
}

impl<'a, C: TxCodec + ?Sized, A: ShareAccounting + ?Sized> Malleator<'a, C, A> {
    pub fn new(params: &'a ChainParams, codec: &'a C, accounting: &'a A) -> Self {
        Self {
            params,
            codec,
            accounting,
        }
    }

    /// Malleates every wire transaction in `entries`, orders and places the
    /// blobs in a square of width `square_size`, and rewraps each canonical
    /// transaction with its blob's start index.
    pub fn malleate_and_place(
        &self,
        entries: Vec<ParsedTx>,
        square_size: usize,
        evidence: &[Evidence],
    ) -> Result<PreparedSquare, PipelineError> {
        self.run(entries, square_size, evidence, cfg!(feature = "parallel"))
    }

    /// The pipeline body. `parallel` selects the rayon path for stage 1
    /// when the feature is compiled in.
    fn run(
        &self,
        entries: Vec<ParsedTx>,
        square_size: usize,
        evidence: &[Evidence],
        parallel: bool,
    ) -> Result<PreparedSquare, PipelineError> {
        if !square_size.is_power_of_two() || square_size > self.params.max_square_size {
            return Err(PipelineError::InvalidSquareSize {
                size: square_size,
                max: self.params.max_square_size,
            });
        }

        info!(
            candidates = entries.len(),
            wire = entries.iter().filter(|e| e.has_wire()).count(),
            square_size,
            evidence = evidence.len(),
            "malleating proposal"
        );

        // Stage 1: MALLEATE. Entries are independent; results stay per entry.
        let results = self.malleate_all(&entries, parallel);

        // Stage 2: TRACK. Fold results into the arena and the dropped list.
        let mut retained: Vec<Retained> = Vec::with_capacity(entries.len());
        let mut dropped = Vec::new();
        for (entry, result) in entries.into_iter().zip(results) {
            match result {
                None => retained.push(Retained {
                    entry,
                    malleated: None,
                }),
                Some(Ok(malleated)) => retained.push(Retained {
                    entry,
                    malleated: Some(malleated),
                }),
                Some(Err(reason)) => {
                    debug!(slot = entry.slot, error = %reason, "dropping transaction from square");
                    dropped.push(DroppedTx {
                        slot: entry.slot,
                        reason,
                    });
                }
            }
        }

        let mut tracked: Vec<(usize, &Blob)> = retained
            .iter()
            .enumerate()
            .filter_map(|(arena_idx, slot)| slot.malleated.as_ref().map(|m| (arena_idx, &m.blob)))
            .collect();

        // Stage 3: ORDER. `sort_by` is stable, equal namespaces keep
        // submission order.
        tracked.sort_by(|a, b| a.1.namespace_id.cmp(&b.1.namespace_id));

        // Stage 4: SPLIT.
        let (origins, blobs): (Vec<usize>, Vec<Blob>) = tracked
            .into_iter()
            .map(|(arena_idx, blob)| (arena_idx, blob.clone()))
            .unzip();

        // Stage 5: MEASURE. The share index has a fixed-width encoding, so
        // wrapping with index 0 yields the final size.
        let tx_sizes = retained
            .iter()
            .map(|slot| match &slot.malleated {
                Some(m) => wrap_malleated_tx(self.codec, m.original_tx_hash, 0, m.canonical_tx.clone())
                    .map(|wrapped| wrapped.len()),
                None => Ok(slot.entry.raw_tx.len()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let compact_shares =
            self.accounting
                .compact_share_count(self.params, &tx_sizes, evidence, square_size);
        let blob_share_counts: Vec<usize> = blobs
            .iter()
            .map(|blob| self.accounting.blob_share_count(self.params, blob))
            .collect();

        // Stage 6: PLACE.
        let (blob_shares, indexes) =
            self.accounting
                .non_interactive_default_indices(compact_shares, square_size, &blob_share_counts);
        if indexes.len() != blobs.len() {
            return Err(PipelineError::PlacementMismatch {
                blobs: blobs.len(),
                indexes: indexes.len(),
            });
        }

        let capacity = square_size * square_size;
        if compact_shares + blob_shares > capacity {
            warn!(
                compact_shares,
                blob_shares,
                capacity,
                "proposal does not fit the square"
            );
        }

        // Stage 7: REWRAP.
        for (&arena_idx, &share_index) in origins.iter().zip(&indexes) {
            let slot = &mut retained[arena_idx];
            let Some(malleated) = slot.malleated.take() else {
                continue;
            };
            let wrapped = wrap_malleated_tx(
                self.codec,
                malleated.original_tx_hash,
                share_index,
                malleated.canonical_tx,
            )
            .map_err(|source| {
                warn!(slot = slot.entry.slot, error = %source, "rewrap failed, aborting proposal");
                PipelineError::Rewrap {
                    slot: slot.entry.slot,
                    source,
                }
            })?;
            slot.entry.malleated_tx = Some(wrapped);
        }

        // Stage 8: ASSEMBLE.
        let txs: Vec<Vec<u8>> = retained
            .into_iter()
            .map(|slot| slot.entry.malleated_tx.unwrap_or(slot.entry.raw_tx))
            .collect();

        info!(
            txs = txs.len(),
            blobs = blobs.len(),
            dropped = dropped.len(),
            compact_shares,
            blob_shares,
            square_size,
            "proposal malleated"
        );

        Ok(PreparedSquare {
            txs,
            blobs,
            dropped,
            compact_shares,
            square_size,
        })
    }

    fn malleate_all(
        &self,
        entries: &[ParsedTx],
        parallel: bool,
    ) -> Vec<Option<Result<Malleated, MalleateError>>> {
        #[cfg(feature = "parallel")]
        {
            if parallel {
                return entries.par_iter().map(|entry| self.malleate_entry(entry)).collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        entries.iter().map(|entry| self.malleate_entry(entry)).collect()
    }

    /// `None` for entries without a wire message.
    fn malleate_entry(&self, entry: &ParsedTx) -> Option<Result<Malleated, MalleateError>> {
        let wire = entry.wire.as_ref()?;
        Some(self.malleate(entry, wire))
    }

    /// Rebuilds the canonical transaction from the envelope's fee settings
    /// and signer, with the signature captured when the wire message was
    /// signed.
    fn malleate(&self, entry: &ParsedTx, wire: &MsgWirePayForBlob) -> Result<Malleated, MalleateError> {
        let envelope = entry.tx.as_ref().ok_or(MalleateError::MissingEnvelope)?;
        let (pfb, blob, signature) = process_wire_pay_for_blob(self.params, wire)?;

        let signer_infos = &envelope.auth_info.signer_infos;
        if signer_infos.len() != 1 {
            return Err(MalleateError::UnexpectedSignerCount(signer_infos.len()));
        }
        let signer = &signer_infos[0];

        let canonical = TxBuilder::new()
            .gas_limit(envelope.gas_limit())
            .fee(envelope.fee())
            .memo(envelope.memo())
            .msg(AnyMsg::pack(&pfb)?)
            .signature_v2(SignatureV2 {
                public_key: signer.public_key.clone(),
                data: SignatureData::Single { signature },
                sequence: signer.sequence,
            })?
            .build();

        Ok(Malleated {
            original_tx_hash: sha256_array(&entry.raw_tx),
            canonical_tx: self.codec.encode_tx(&canonical)?,
            blob,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
