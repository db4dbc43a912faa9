use std::path::PathBuf;

use brewlog_core::{EntityKind, LocalId};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "brewlog")]
#[command(about = "Keep a tea catalogue in sync from the command line, online or not")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local store file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// API base URL (overrides BREWLOG_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds (overrides BREWLOG_TIMEOUT_MS)
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload pending entries, then refresh collections from the server
    Sync {
        /// Collection to sync (all when omitted)
        #[arg(value_enum)]
        kind: Option<KindArg>,
    },
    /// Upload pending entries without refreshing
    Upload {
        /// Collection to upload (all when omitted)
        #[arg(value_enum)]
        kind: Option<KindArg>,
    },
    /// List a collection as stored locally
    List {
        #[arg(value_enum)]
        kind: KindArg,
        /// Sync with the server first
        #[arg(long)]
        refresh: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a tea to the catalogue
    AddTea {
        /// Tea name
        name: Vec<String>,
        /// Category ID
        #[arg(long, default_value = "1")]
        category: u32,
        /// Vendor name
        #[arg(long)]
        vendor: Option<String>,
        /// Harvest year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Start a brewing session
    StartSession {
        /// Initial infusion time (HH:MM:SS or seconds)
        #[arg(long, default_value = "00:00:20")]
        initial: String,
        /// Time added on every following infusion (HH:MM:SS or seconds)
        #[arg(long, default_value = "00:00:05")]
        increments: String,
        /// Name of the tea being brewed
        #[arg(long)]
        tea: Option<String>,
        /// Start the first infusion countdown right away
        #[arg(long)]
        clock: bool,
    },
    /// Delete an entry by its local ID
    Delete {
        #[arg(value_enum)]
        kind: KindArg,
        local_id: LocalId,
    },
    /// Manage brewing countdowns
    Clock {
        #[command(subcommand)]
        command: ClockCommands,
    },
    /// Show entries waiting to be uploaded
    Pending {
        #[arg(value_enum)]
        kind: KindArg,
        /// Output as JSON
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

#[derive(Subcommand)]
pub enum ClockCommands {
    /// Start the countdown of a session's current infusion
    Start { session: LocalId },
    /// Stop a running countdown
    Cancel { session: LocalId },
    /// List running countdowns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "teas")]
    Tea,
    #[value(alias = "sessions")]
    Session,
    #[value(alias = "vendors")]
    Vendor,
    #[value(alias = "subcategories")]
    Subcategory,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tea => Self::Tea,
            KindArg::Session => Self::Session,
            KindArg::Vendor => Self::Vendor,
            KindArg::Subcategory => Self::Subcategory,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
