//! # Share Accounting
//!
//! How many shares block data occupies, and where each blob starts.
//!
//! ```text
//! | compact tx shares | compact evidence shares | pad | blob | pad | blob | ...
//!                                                      ^ non-interactive default index
//! ```
//!
//! Blobs are laid out after the compact shares following the
//! non-interactive default rules: a blob starts either at the beginning of a
//! row, or at a multiple of the largest power of two not exceeding its own
//! share count. Every node can recompute the start index from the sorted
//! blob sizes alone, so no index data is gossiped.
//!
//! The pipeline only talks to this module through [`ShareAccounting`];
//! [`NonInteractiveDefaults`] is the arithmetic mainnet uses.

use crate::block::{Blob, Evidence};
use crate::config::{ChainParams, SHARE_INFO_BYTES, SHARE_VERSION};
use crate::namespace::NamespaceId;
use crate::square::round_down_power_of_two;

/// Share-count arithmetic consumed by the placement pipeline.
pub trait ShareAccounting: Send + Sync {
    /// Number of sparse shares `blob` occupies.
    fn blob_share_count(&self, params: &ChainParams, blob: &Blob) -> usize;

    /// Number of compact shares used by transactions of the given encoded
    /// sizes plus the evidence, for a square of `square_size`.
    fn compact_share_count(
        &self,
        params: &ChainParams,
        tx_sizes: &[usize],
        evidence: &[Evidence],
        square_size: usize,
    ) -> usize;

    /// Starting share index of each blob, placed in order after `cursor`
    /// shares. Returns the shares consumed by the blobs (including alignment
    /// padding) and one index per blob.
    fn non_interactive_default_indices(
        &self,
        cursor: usize,
        square_size: usize,
        blob_share_counts: &[usize],
    ) -> (usize, Vec<u32>);
}

/// The mainnet share layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractiveDefaults;

impl ShareAccounting for NonInteractiveDefaults {
    fn blob_share_count(&self, params: &ChainParams, blob: &Blob) -> usize {
        blob_shares_used(params, blob.len())
    }

    fn compact_share_count(
        &self,
        params: &ChainParams,
        tx_sizes: &[usize],
        evidence: &[Evidence],
        _square_size: usize,
    ) -> usize {
        let tx_shares = compact_shares_used(params, tx_sizes.iter().copied());
        let evidence_shares = compact_shares_used(params, evidence.iter().map(Evidence::len));
        tx_shares + evidence_shares
    }

    fn non_interactive_default_indices(
        &self,
        cursor: usize,
        square_size: usize,
        blob_share_counts: &[usize],
    ) -> (usize, Vec<u32>) {
        blob_shares_used_non_interactive_defaults(cursor, square_size, blob_share_counts)
    }
}

// ---------------------------------------------------------------------------
// Length delimiters
// ---------------------------------------------------------------------------

/// Bytes needed to encode `n` as an unsigned LEB128 varint.
pub fn delim_len(n: u64) -> usize {
    let bits = u64::BITS - (n | 1).leading_zeros();
    bits.div_ceil(7) as usize
}

/// Appends `n` as an unsigned LEB128 varint.
pub fn encode_varint(mut n: u64, buf: &mut Vec<u8>) {
    while n >= 0x80 {
        buf.push((n as u8) | 0x80);
        n >>= 7;
    }
    buf.push(n as u8);
}

// ---------------------------------------------------------------------------
// Sparse (blob) shares
// ---------------------------------------------------------------------------

/// Sparse shares needed for a blob of `blob_len` bytes, including its length
/// prefix.
pub fn blob_shares_used(params: &ChainParams, blob_len: usize) -> usize {
    let total = delim_len(blob_len as u64) + blob_len;
    total.div_ceil(params.sparse_share_content_size())
}

/// Splits a blob into its sparse shares: `namespace || info || chunk`, with
/// the blob length prefixed to the first chunk and the last share zero-padded.
pub fn sparse_shares(params: &ChainParams, namespace: &NamespaceId, data: &[u8]) -> Vec<Vec<u8>> {
    let mut content = Vec::with_capacity(data.len() + delim_len(data.len() as u64));
    encode_varint(data.len() as u64, &mut content);
    content.extend_from_slice(data);

    let chunk_size = params.sparse_share_content_size();
    content
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| {
            let mut share = Vec::with_capacity(params.share_size);
            share.extend_from_slice(namespace.as_bytes());
            share.push(info_byte(i == 0));
            share.extend_from_slice(chunk);
            share.resize(params.share_size, 0);
            share
        })
        .collect()
}

fn info_byte(sequence_start: bool) -> u8 {
    debug_assert_eq!(SHARE_INFO_BYTES, 1);
    (SHARE_VERSION << 1) | u8::from(sequence_start)
}

// ---------------------------------------------------------------------------
// Compact (transaction / evidence) shares
// ---------------------------------------------------------------------------

/// Compact shares needed for a stream of length-delimited units in a single
/// namespace. An empty stream occupies no shares.
pub fn compact_shares_used(params: &ChainParams, unit_sizes: impl Iterator<Item = usize>) -> usize {
    let stream_len: usize = unit_sizes.map(|len| delim_len(len as u64) + len).sum();
    if stream_len == 0 {
        return 0;
    }

    let first = params.first_compact_share_content_size();
    if stream_len <= first {
        return 1;
    }
    1 + (stream_len - first).div_ceil(params.continuation_compact_share_content_size())
}

// ---------------------------------------------------------------------------
// Non-interactive default placement
// ---------------------------------------------------------------------------

/// Next index at or after `cursor` where a blob of `blob_len` shares may
/// start. The flag reports whether the whole blob fits in the cursor's row.
///
/// `square_size` must be a power of two.
pub fn next_aligned_power_of_two(cursor: usize, blob_len: usize, square_size: usize) -> (usize, bool) {
    if cursor % square_size == 0 {
        return (cursor, true);
    }

    let next_lowest = round_down_power_of_two(blob_len.max(1));
    let end_of_row = (cursor / square_size + 1) * square_size;
    let aligned = cursor.next_multiple_of(next_lowest);

    if aligned + blob_len <= end_of_row {
        (aligned, true)
    } else if aligned + next_lowest <= end_of_row {
        (aligned, false)
    } else {
        (end_of_row, false)
    }
}

/// Places blobs of the given share counts in order starting at `cursor`.
/// Returns the shares consumed (padding included) and each start index.
pub fn blob_shares_used_non_interactive_defaults(
    cursor: usize,
    square_size: usize,
    blob_share_counts: &[usize],
) -> (usize, Vec<u32>) {
    let start = cursor;
    let mut cursor = cursor;
    let mut indexes = Vec::with_capacity(blob_share_counts.len());
    for &len in blob_share_counts {
        cursor = next_aligned_power_of_two(cursor, len, square_size).0;
        indexes.push(cursor as u32);
        cursor += len;
    }
    (cursor - start, indexes)
}
