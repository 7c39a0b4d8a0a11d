//! Clap derive structures for the `vantage` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vantage -- one view over many monitoring datacenters
#[derive(Debug, Parser)]
#[command(
    name = "vantage",
    version,
    about = "Aggregate and inspect several monitoring datacenters",
    long_about = "Polls every configured monitoring datacenter, merges their checks,\n\
        clients, events, aggregates, stashes and silences into one snapshot,\n\
        and reports per-datacenter health.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the TOML config file
    #[arg(long, short = 'c', env = "VANTAGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty tables (default)
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate the configuration, then list datacenters and roles
    CheckConfig,

    /// Poll every datacenter once and print health and object counts
    Poll(PollArgs),

    /// Poll continuously, logging health after every snapshot, until Ctrl-C
    Run,
}

#[derive(Debug, Args)]
pub struct PollArgs {
    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,
}
