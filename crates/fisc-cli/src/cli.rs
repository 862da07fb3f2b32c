//! Argument definitions for the `fisc` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "fisc",
    version,
    about = "Computation-tree capture, storage, and AI explanation"
)]
pub struct Cli {
    /// Only log errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log debug detail.
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Persist a captured computation tree and print its uuid.
    Store(StoreArgs),
    /// Print a stored tree record as JSON.
    Fetch(FetchArgs),
    /// Extract the subtree for one variable from a tree file (offline).
    Extract(ExtractArgs),
    /// Generate an AI explanation for a stored tree.
    Explain(ExplainArgs),
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Country whose engine produced the trace (e.g. `us`, `uk`). Defaults to the
    /// configured `general.default_country`.
    #[arg(long)]
    pub country: Option<String>,

    /// File with one indentation-encoded trace line per row.
    #[arg(long)]
    pub tree: PathBuf,

    /// JSON file mapping entity groups to ordered entity names.
    #[arg(long)]
    pub entities: PathBuf,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Id of the stored tree record.
    pub uuid: Uuid,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// File with one indentation-encoded trace line per row.
    #[arg(long)]
    pub tree: PathBuf,

    /// Variable whose subtree to extract.
    #[arg(long)]
    pub variable: String,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Country whose metadata annotates the tree. Defaults to the configured
    /// `general.default_country`.
    #[arg(long)]
    pub country: Option<String>,

    /// Id of the stored tree record to explain from.
    #[arg(long)]
    pub uuid: Uuid,

    /// Household JSON with exactly one variable set to null.
    #[arg(long)]
    pub household: PathBuf,

    /// Country calculation metadata JSON (variables and entities).
    #[arg(long)]
    pub metadata: PathBuf,

    /// Stream NDJSON frames instead of one buffered payload.
    #[arg(long)]
    pub stream: bool,
}
