use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::RootKind;

#[derive(Parser)]
#[command(
    name = "converge",
    about = "Converge a managed JSON tree onto a target snapshot",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./converge.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Emit single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[arg(long, global = true)]
    pub no_color: bool,

    /// Container kind of the managed root
    #[arg(long, global = true)]
    pub root: Option<RootKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile the current state onto a target and report the mutations
    Sync(SyncArgs),
    /// Check whether two documents are structurally equal
    Equals(EqualsArgs),
    /// Print the structural fingerprint of a document
    Fingerprint(FingerprintArgs),
}

#[derive(Args)]
pub struct SyncArgs {
    /// Current state; a missing file starts from an empty root
    pub current: PathBuf,
    pub target: PathBuf,
    /// Write the converged tree back to the current file
    #[arg(short, long)]
    pub write: bool,
}

#[derive(Args)]
pub struct EqualsArgs {
    pub current: PathBuf,
    pub target: PathBuf,
}

#[derive(Args)]
pub struct FingerprintArgs {
    pub file: PathBuf,
}
