//! DataGenie CLI - Ask questions about your CSV data
//!
//! Usage:
//!   genie init                              Initialize database
//!   genie register --user alice             Create an account
//!   genie upload --user alice --file CSV    Clean and record a dataset
//!   genie ask --file CSV "total sales?"     Answer a question
//!   genie serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Register { user, password } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let password = commands::resolve_password(password.as_deref())?;
            commands::cmd_register(&db, &user, &password).map(|_| ())
        }
        Commands::Upload { user, file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let password = commands::resolve_password(user.password.as_deref())?;
            commands::cmd_upload(&db, &config, &user.user, &password, &file).map(|_| ())
        }
        Commands::Uploads { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let password = commands::resolve_password(user.password.as_deref())?;
            commands::cmd_uploads(&db, &user.user, &password, json)
        }
        Commands::Summary { file, json } => commands::cmd_summary(&file, &config, json),
        Commands::Stats { file, json } => commands::cmd_stats(&file, &config, json),
        Commands::Forecast {
            file,
            column,
            horizon,
            json,
        } => commands::cmd_forecast(&file, &config, column.as_deref(), horizon, json),
        Commands::Groups {
            file,
            by,
            value,
            json,
        } => commands::cmd_groups(&file, &config, &by, &value, json),
        Commands::Histogram {
            file,
            column,
            bins,
            json,
        } => commands::cmd_histogram(&file, &config, column.as_deref(), bins, json),
        Commands::Ask {
            file,
            question,
            json,
        } => commands::cmd_ask(&file, &config, &question, json),
        Commands::Report {
            file,
            format,
            output,
        } => commands::cmd_report(&file, &config, &format, output.as_deref()),
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                allowed_origins,
                config,
            )
            .await
        }
    }
}
