// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera Node
//!
//! Entry point for the `tessera-node` binary. Parses CLI arguments,
//! initializes logging and dispatches to the block builder.
//!
//! The binary supports four subcommands:
//!
//! - `square-size` : print the minimum square width
//! - `prepare`     : malleate and place a proposal from a JSON file
//! - `keygen`      : generate a devnet keypair and address
//! - `version`     : print build version information

mod cli;
mod input;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use tessera_protocol::address::Address;
use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::proposal::{estimate_square_size, parse_txs, Malleator};
use tessera_protocol::shares::{blob_shares_used, NonInteractiveDefaults};
use tessera_protocol::square::min_square_size;
use tessera_protocol::transaction::BincodeCodec;

use cli::{Commands, TesseraNodeCli};
use input::SquareSummary;
use logging::LogFormat;

const DEFAULT_LOG_FILTER: &str = "tessera_node=info,tessera_protocol=info";

fn main() -> Result<()> {
    let cli = TesseraNodeCli::parse();

    match cli.command {
        Commands::SquareSize(args) => square_size(args),
        Commands::Prepare(args) => prepare(args),
        Commands::Keygen(args) => keygen(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Prints the minimum square width for a share count or a single blob.
fn square_size(args: cli::SquareSizeArgs) -> Result<()> {
    let shares = match (args.shares, args.bytes) {
        (Some(shares), _) => shares,
        (None, Some(bytes)) => blob_shares_used(&tessera_protocol::ChainParams::mainnet(), bytes),
        (None, None) => anyhow::bail!("one of --shares or --bytes is required"),
    };
    println!("{}", min_square_size(shares));
    Ok(())
}

/// Runs the malleation pipeline over a proposal file and prints the
/// resulting square as JSON.
fn prepare(args: cli::PrepareArgs) -> Result<()> {
    logging::init_logging(DEFAULT_LOG_FILTER, LogFormat::from(args.log_format));

    let params = input::load_params(args.params.as_deref())?;
    let proposal = input::load_proposal(&args.input)?;

    tracing::info!(
        chain_id = %params.chain_id,
        txs = proposal.txs.len(),
        evidence = proposal.evidence.len(),
        input = %args.input.display(),
        "preparing proposal"
    );

    let codec = BincodeCodec;
    let accounting = NonInteractiveDefaults;
    let entries = parse_txs(&codec, &proposal.txs).context("failed to parse proposal")?;

    let square_size = match args.square_size {
        Some(size) => {
            anyhow::ensure!(
                size.is_power_of_two() && size <= params.max_square_size,
                "square size {} must be a power of two no larger than {}",
                size,
                params.max_square_size
            );
            size
        }
        None => estimate_square_size(&params, &accounting, &entries, &proposal.evidence),
    };

    let square = Malleator::new(&params, &codec, &accounting)
        .malleate_and_place(entries, square_size, &proposal.evidence)
        .context("failed to malleate proposal")?;

    tracing::info!(
        square_size = square.square_size,
        txs = square.txs.len(),
        blobs = square.blobs.len(),
        dropped = square.dropped.len(),
        "proposal prepared"
    );

    let summary = SquareSummary::from(&square);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode summary")?
    );
    Ok(())
}

/// Generates a fresh keypair and prints its address and key material.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let keypair = Keypair::generate();
    let address = Address::from_public_key(&keypair.public_key_bytes())
        .to_bech32(&args.hrp)
        .with_context(|| format!("invalid address prefix {:?}", args.hrp))?;

    println!("Address     : {}", address);
    println!("Public key  : {}", hex::encode(keypair.public_key_bytes()));
    println!("Secret seed : {}", hex::encode(keypair.seed_bytes()));
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("tessera-node {}", env!("CARGO_PKG_VERSION"));
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
