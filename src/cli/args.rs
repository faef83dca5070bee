//! CLI argument definitions.

use crate::cli::validators::{parse_alpha, parse_positive, parse_threshold};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Identify individual animals by fusing global retrieval with local matching.
#[derive(Debug, Parser)]
#[command(name = "wildreid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for identification.
    #[command(flatten)]
    pub identify: IdentifyArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Summarize species groups and their preprocessing.
    Species {
        /// Metadata CSV to summarize.
        #[arg(long, env = "WILDREID_METADATA")]
        metadata: Option<PathBuf>,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for identification.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct IdentifyArgs {
    /// Metadata CSV listing every database and query image.
    #[arg(long, env = "WILDREID_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Global embedding table, one headerless row per image.
    #[arg(long, env = "WILDREID_EMBEDDINGS")]
    pub embeddings: Option<PathBuf>,

    /// Local match scores per query and database image pair.
    #[arg(long, env = "WILDREID_LOCAL_SCORES")]
    pub local_scores: Option<PathBuf>,

    /// Submission file to write.
    #[arg(short, long, env = "WILDREID_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Weight of the global score in the fused score (0.0-1.0).
    #[arg(long, value_parser = parse_alpha, env = "WILDREID_ALPHA")]
    pub alpha: Option<f32>,

    /// Number of shortlisted candidates re-scored locally.
    #[arg(short = 'k', long = "shortlist", value_parser = parse_positive, env = "WILDREID_SHORTLIST")]
    pub shortlist_size: Option<usize>,

    /// Fused scores below this are new individuals (0.0-1.0).
    #[arg(short = 't', long, value_parser = parse_threshold, env = "WILDREID_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Fit score calibration on the leading database records.
    #[arg(long, env = "WILDREID_CALIBRATE")]
    pub calibrate: bool,

    /// Number of database records used for calibration.
    #[arg(long, value_parser = parse_positive, env = "WILDREID_CALIBRATION_SIZE")]
    pub calibration_size: Option<usize>,

    /// Disable query expansion.
    #[arg(long, env = "WILDREID_NO_QUERY_EXPANSION")]
    pub no_query_expansion: bool,

    /// Concurrent local matcher calls (1 = sequential).
    #[arg(long, value_parser = parse_positive, env = "WILDREID_MAX_PARALLEL")]
    pub max_parallel: Option<usize>,

    /// Configuration file (default: platform config directory).
    #[arg(long, env = "WILDREID_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long, env = "WILDREID_NO_PROGRESS")]
    pub no_progress: bool,
}
