//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve limits and defaults
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use genie_core::{db::Database, GenieConfig};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Load config from --config, the user override or the built-in defaults
pub fn load_config(explicit: Option<&Path>) -> Result<GenieConfig> {
    GenieConfig::load(explicit).context("Failed to load configuration")
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create an account: genie register --user alice");
    println!("  2. Upload a dataset: genie upload --user alice --file sales.csv");
    println!("  3. Start web UI: genie serve");

    Ok(())
}
