//! # CLI Interface
//!
//! Defines the command-line argument structure for `tessera-node` using
//! `clap` derive. Supports four subcommands: `square-size`, `prepare`,
//! `keygen` and `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Tessera block builder.
///
/// Operator tooling around the malleation pipeline: sizes squares, runs a
/// proposal pass over a file of raw transactions and mints devnet keys.
#[derive(Parser, Debug)]
#[command(
    name = "tessera-node",
    about = "Tessera block builder",
    version,
    propagate_version = true
)]
pub struct TesseraNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the Tessera node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the minimum square width for a share count or a blob size.
    SquareSize(SquareSizeArgs),
    /// Malleate and place a proposal read from a JSON file.
    Prepare(PrepareArgs),
    /// Generate a fresh keypair and print its address.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `square-size` subcommand. Exactly one of the two
/// inputs must be given.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SquareSizeArgs {
    /// Number of shares the square must hold.
    #[arg(long)]
    pub shares: Option<usize>,

    /// Size in bytes of a single blob the square must hold.
    #[arg(long)]
    pub bytes: Option<usize>,
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// JSON file with hex-encoded raw transactions and evidence.
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// JSON file with chain parameter overrides.
    ///
    /// When omitted, mainnet defaults are used.
    #[arg(long, short = 'p', env = "TESSERA_PARAMS")]
    pub params: Option<PathBuf>,

    /// Fixed square width. Estimated from the working set when omitted.
    #[arg(long)]
    pub square_size: Option<usize>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}

/// Arguments for the `keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Bech32 prefix for the printed address.
    #[arg(long, default_value = tessera_protocol::config::ADDRESS_HRP)]
    pub hrp: String,
}

/// `--log-format` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
