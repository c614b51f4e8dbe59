//! Errors that abort a whole block-building pass.
//!
//! Per-entry malleation failures never show up here; they are recorded as
//! [`super::DroppedTx`] and the pass continues.

use thiserror::Error;

use crate::blob::ExtractError;
use crate::transaction::CodecError;

/// A pipeline failure. No partial square is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A wire transaction could not be extracted unambiguously.
    #[error("transaction {slot}: {source}")]
    Extract {
        slot: usize,
        #[source]
        source: ExtractError,
    },

    /// A placed transaction could not be rewrapped with its share index.
    #[error("transaction {slot}: failed to rewrap with share index: {source}")]
    Rewrap {
        slot: usize,
        #[source]
        source: CodecError,
    },

    /// The square width is zero, not a power of two, or above the chain
    /// maximum.
    #[error("invalid square size {size}: must be a power of two no larger than {max}")]
    InvalidSquareSize { size: usize, max: usize },

    /// The share accounting returned a different number of indexes than
    /// there are blobs.
    #[error("placement returned {indexes} indexes for {blobs} blobs")]
    PlacementMismatch { blobs: usize, indexes: usize },

    /// Encoding failed while measuring transaction sizes.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
