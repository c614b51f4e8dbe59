//! # Proposal Input and Output
//!
//! The `prepare` subcommand reads a JSON file of hex-encoded raw
//! transactions and evidence, and prints a JSON summary of the prepared
//! square.
//!
//! ```json
//! { "txs": ["0a1b..", "ffee.."], "evidence": ["c0de.."] }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use tessera_protocol::block::Evidence;
use tessera_protocol::proposal::PreparedSquare;
use tessera_protocol::ChainParams;

/// Raw proposal file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalFile {
    pub txs: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Decoded proposal, ready for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalInput {
    pub txs: Vec<Vec<u8>>,
    pub evidence: Vec<Evidence>,
}

/// Reads and hex-decodes a proposal file.
pub fn load_proposal(path: &Path) -> Result<ProposalInput> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read proposal file {}", path.display()))?;
    let file: ProposalFile = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse proposal file {}", path.display()))?;

    let txs = file
        .txs
        .iter()
        .enumerate()
        .map(|(i, tx)| hex::decode(tx).with_context(|| format!("transaction {} is not hex", i)))
        .collect::<Result<Vec<_>>>()?;
    let evidence = file
        .evidence
        .iter()
        .enumerate()
        .map(|(i, ev)| {
            hex::decode(ev)
                .map(Evidence)
                .with_context(|| format!("evidence {} is not hex", i))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProposalInput { txs, evidence })
}

/// Loads chain parameters from `path`, or mainnet defaults when absent.
/// Loaded parameters are validated.
pub fn load_params(path: Option<&Path>) -> Result<ChainParams> {
    let Some(path) = path else {
        return Ok(ChainParams::mainnet());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read params file {}", path.display()))?;
    ChainParams::from_json_str(&json)
        .with_context(|| format!("invalid chain params in {}", path.display()))
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// A placed blob, as printed.
#[derive(Debug, Clone, Serialize)]
pub struct BlobSummary {
    pub namespace_id: String,
    pub size: usize,
}

/// A dropped transaction, as printed.
#[derive(Debug, Clone, Serialize)]
pub struct DroppedSummary {
    pub slot: usize,
    pub reason: String,
}

/// JSON summary of a prepared square.
#[derive(Debug, Clone, Serialize)]
pub struct SquareSummary {
    pub square_size: usize,
    pub compact_shares: usize,
    pub txs: Vec<String>,
    pub blobs: Vec<BlobSummary>,
    pub dropped: Vec<DroppedSummary>,
}

impl From<&PreparedSquare> for SquareSummary {
    fn from(square: &PreparedSquare) -> Self {
        Self {
            square_size: square.square_size,
            compact_shares: square.compact_shares,
            txs: square.txs.iter().map(hex::encode).collect(),
            blobs: square
                .blobs
                .iter()
                .map(|b| BlobSummary {
                    namespace_id: hex::encode(b.namespace_id.as_bytes()),
                    size: b.len(),
                })
                .collect(),
            dropped: square
                .dropped
                .iter()
                .map(|d| DroppedSummary {
                    slot: d.slot,
                    reason: d.reason.to_string(),
                })
                .collect(),
        }
    }
}
