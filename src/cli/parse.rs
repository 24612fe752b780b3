//! CLI parse: clap types for gat. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gat - minimal content-addressed version control
#[derive(Parser)]
#[command(name = "gat")]
#[command(about = "Snapshot a directory, keep its history, and check any snapshot back out")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Work tree root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Never colorize command output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the .gat metadata directory (every command does this implicitly)
    Init,
    /// Snapshot the whole work tree and commit it on the current branch
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Create a branch at the current commit and switch to it
    Branch {
        /// Branch name
        name: String,
    },
    /// Switch to a branch and check out its latest commit
    Checkout {
        /// Branch name
        name: String,
    },
    /// Restore the work tree to a commit and move the current branch to it
    Revert {
        /// Commit hash
        hash: String,
    },
    /// Show the history of the current branch
    Log {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Show at most this many commits
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show the current branch, its head commit and all branches
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the decompressed content of a stored object
    CatObject {
        /// Object hash
        #[arg(required_unless_present = "path")]
        hash: Option<String>,
        /// Read an object file by path instead of by hash
        #[arg(long, conflicts_with = "hash")]
        path: Option<PathBuf>,
    },
    /// Rehash every stored object and report corrupt ones
    Verify {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
