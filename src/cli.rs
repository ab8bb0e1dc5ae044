use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "scrimlog backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Ingest a batch of scrim log files as one scrim
    Import {
        /// Log files (.txt or .csv), one map per file
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Human-readable scrim name
        #[arg(long)]
        name: String,
        /// Scrim date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Internal team the scrim belongs to
        #[arg(long)]
        team_id: Option<i64>,
        /// Explicit opponent name override
        #[arg(long)]
        opponent: Option<String>,
    },
    /// Scan the identity catalog for likely duplicate players
    FindDuplicates {
        /// Similarity threshold in [0, 1]; defaults to the configured value
        #[arg(long)]
        threshold: Option<f64>,
    },
}
