//! Account and upload history commands (register, upload, uploads)

use std::path::Path;

use anyhow::{Context, Result};
use genie_core::{
    db::Database, load_path, GenieConfig, LoadOptions, NewUpload, Session, UploadRecord, User,
};
use tracing::info;

/// Environment variable consulted when --password is not given
pub const PASSWORD_ENV: &str = "GENIE_PASSWORD";

/// Use the explicit password, else the environment
pub fn resolve_password(explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(p) => Ok(p.to_string()),
        None => std::env::var(PASSWORD_ENV)
            .with_context(|| format!("Pass --password or set {}", PASSWORD_ENV)),
    }
}

/// Authenticate or fail with a user-facing message
pub fn login(db: &Database, username: &str, password: &str) -> Result<User> {
    db.authenticate(username, password)?
        .context("Invalid username or password")
}

pub fn cmd_register(db: &Database, username: &str, password: &str) -> Result<i64> {
    let id = db
        .create_user(username, password)
        .with_context(|| format!("Failed to register '{}'", username.trim()))?;

    println!("✅ Registered user '{}' (id {})", username.trim(), id);
    Ok(id)
}

/// Load, clean and record a dataset upload
///
/// The file is loaded before anything is recorded, so a rejected file
/// leaves no history entry.
pub fn cmd_upload(
    db: &Database,
    config: &GenieConfig,
    username: &str,
    password: &str,
    file: &Path,
) -> Result<i64> {
    let user = login(db, username, password)?;
    let mut session = Session::authenticated(user.clone());

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    if bytes.len() > config.max_upload_bytes {
        anyhow::bail!(
            "File too large: {} bytes (maximum {})",
            bytes.len(),
            config.max_upload_bytes
        );
    }

    let raw = load_path(file, &LoadOptions::from(config))
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let cleaning = session.load_table(&raw)?;

    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv");
    let upload_id = db.record_upload(user.id, &NewUpload::from_bytes(filename, &bytes))?;
    info!(user_id = user.id, upload_id, "Recorded upload");

    println!("📥 Uploaded {}", filename);
    if let Some(engine) = session.dataset() {
        let summary = engine.summary();
        println!("   Rows: {}", summary.rows);
        println!("   Columns: {}", summary.columns);
    }
    println!("   Duplicates removed: {}", cleaning.duplicates_removed);
    println!(
        "   Missing values filled: {}",
        cleaning.numeric_cells_filled + cleaning.text_cells_filled
    );
    if !cleaning.empty_columns.is_empty() {
        println!(
            "   ⚠️  Columns with no values: {}",
            cleaning.empty_columns.join(", ")
        );
    }

    Ok(upload_id)
}

pub fn cmd_uploads(db: &Database, username: &str, password: &str, json: bool) -> Result<()> {
    let user = login(db, username, password)?;
    let uploads = db.list_uploads(user.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&uploads)?);
        return Ok(());
    }

    if uploads.is_empty() {
        println!("No uploads yet. Upload a dataset with:");
        println!("  genie upload --user {} --file data.csv", user.username);
        return Ok(());
    }

    println!();
    println!("📂 Previous Uploads ({})", user.username);
    println!("   ─────────────────────────────────────────────────────────────");
    for upload in &uploads {
        println!("   {}", format_upload(upload));
    }
    println!();

    Ok(())
}

/// One history line: id, time, name, size
pub fn format_upload(upload: &UploadRecord) -> String {
    format!(
        "#{:<4} {}  {}  ({} bytes)",
        upload.id,
        upload.uploaded_at.format("%Y-%m-%d %H:%M"),
        upload.filename,
        upload.size_bytes
    )
}
