use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "colorcodex")]
#[command(about = "Collect random colors locally and push them to the cloud")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a new color (random when no code is given)
    #[command(alias = "new")]
    Add {
        /// Hex color code such as #A1B2C3
        code: Option<String>,
        /// Creation time in Unix milliseconds (defaults to now)
        #[arg(long, value_name = "MS")]
        timestamp: Option<i64>,
        /// Explicit color id; an existing id leaves the store untouched
        #[arg(long, value_name = "ID")]
        id: Option<i64>,
    },
    /// List stored colors
    List {
        /// Only show colors not yet pushed
        #[arg(long)]
        unsynced: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: add and sync colors while a live listing updates
    Session {
        /// Only show colors not yet pushed
        #[arg(long)]
        unsynced: bool,
    },
    /// Push unsynced colors to the configured remote database
    Sync {
        /// Output the sync report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
