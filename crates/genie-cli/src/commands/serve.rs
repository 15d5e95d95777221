//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use genie_core::GenieConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
    settings: GenieConfig,
) -> Result<()> {
    println!("🚀 Starting DataGenie web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 Allowed origins: {}", allowed_origins.join(", "));
    }
    println!(
        "   ⏱️  Sessions expire after {} minutes idle",
        settings.session_timeout.as_secs() / 60
    );
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = genie_server::ServerConfig {
        allowed_origins,
        settings,
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path must be valid UTF-8"))
        .transpose()?;
    genie_server::serve(db, host, port, static_dir_str, config).await?;

    Ok(())
}
