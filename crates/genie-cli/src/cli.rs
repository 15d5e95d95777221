//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// DataGenie - Ask questions about your CSV data
#[derive(Parser)]
#[command(name = "genie")]
#[command(about = "Dataset assistant: clean, summarize, forecast and query CSV and Excel files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "genie.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set GENIE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Config file (defaults to ~/.local/share/genie/config/genie.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials for commands that act on behalf of a user
#[derive(clap::Args, Debug, Clone)]
pub struct UserArgs {
    /// Username
    #[arg(short, long)]
    pub user: String,

    /// Password (falls back to the GENIE_PASSWORD environment variable)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Create a user account
    Register {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Password (falls back to the GENIE_PASSWORD environment variable)
        #[arg(long)]
        password: Option<String>,
    },

    /// Load and clean a CSV or Excel file, recording the upload for a user
    Upload {
        #[command(flatten)]
        user: UserArgs,

        /// CSV or Excel file to upload
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List a user's previous uploads, newest first
    Uploads {
        #[command(flatten)]
        user: UserArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show row and column counts and what cleaning changed
    Summary {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show count, sum, mean, max and min for every numeric column
    Stats {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict upcoming values of a numeric column with a linear trend
    Forecast {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Column to forecast (defaults to the first numeric column)
        #[arg(short, long)]
        column: Option<String>,

        /// Number of positions to predict (defaults to the configured horizon)
        #[arg(long)]
        horizon: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Total a numeric column per distinct value of another column
    Groups {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Column whose values form the groups
        #[arg(short, long)]
        by: String,

        /// Numeric column to total
        #[arg(long)]
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the distribution of a numeric column as equal-width bins
    Histogram {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Column to bin (defaults to the first numeric column)
        #[arg(short, long)]
        column: Option<String>,

        /// Number of bins
        #[arg(short, long, default_value_t = genie_core::insights::DEFAULT_BINS)]
        bins: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question, e.g. "What is the average Sales?"
    Ask {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// The question
        question: String,

        /// Output the structured answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or save a summary report
    Report {
        /// CSV or Excel file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Report format: text, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Static files directory (for web UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origins (comma-separated)
        #[arg(long, value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },
}
