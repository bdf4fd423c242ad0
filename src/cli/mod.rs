//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Output format for query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
}

/// ragdesk - retrieval over the HR policy knowledge base
#[derive(Parser, Debug)]
#[command(name = "ragdesk", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: ~/.ragdesk/config.json)
    #[arg(long, global = true, env = "RAGDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Knowledge base JSON file (default: bundled dataset)
    #[arg(long, global = true, env = "RAGDESK_KB")]
    pub kb: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank knowledge chunks against a question
    Search {
        /// The question
        query: String,

        /// Number of chunks to return (default: configured top-K)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Use literal keyword matching instead of embeddings
        #[arg(long)]
        keywords: bool,
    },

    /// Print the prompt context for a question
    Context {
        /// The question
        query: String,

        /// Number of chunks to include (default: configured top-K)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// List chunks of one category
    Category {
        /// Category id or label (e.g. remote-work, "Remote Work")
        name: String,

        /// Maximum chunks to return (default: configured top-K)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Vector index management
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },

    /// Knowledge base inspection
    Kb {
        #[command(subcommand)]
        command: KbCommands,
    },

    /// Embedding provider checks
    Embeddings {
        #[command(subcommand)]
        command: EmbeddingsCommands,
    },

    /// Settings management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Index Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum IndexCommands {
    /// Embed the knowledge base and write a precomputed index file
    Build {
        /// Output path (default: configured index path or ~/.ragdesk/index.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show metadata of a precomputed index file
    Status {
        /// Index file (default: configured index path or ~/.ragdesk/index.json)
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

// ============================================================================
// Knowledge Base Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum KbCommands {
    /// List chunks in store order
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List every distinct keyword
    Keywords,
}

// ============================================================================
// Embeddings Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum EmbeddingsCommands {
    /// Show provider configuration
    Status,

    /// Embed a text once and show the result
    Test {
        /// Text to embed
        text: String,
    },
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,

    /// Store values in the settings file (merged with existing values)
    Set(ConfigSetArgs),

    /// Remove all stored settings
    Reset,
}

#[derive(clap::Args, Debug, Default)]
pub struct ConfigSetArgs {
    /// Embedding API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Embedding model id
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding API base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Chunks embedded concurrently per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause between batches in milliseconds
    #[arg(long)]
    pub batch_delay_ms: Option<u64>,

    /// Precomputed index file to load at startup
    #[arg(long)]
    pub index_path: Option<PathBuf>,

    /// Default number of chunks per query
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Enable embeddings
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable embeddings
    #[arg(long)]
    pub disable: bool,
}
