//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Dataset commands (summary, stats, forecast, groups, histogram, ask,
//!   report)
//! - `core` - Core commands (init) and shared utilities (open_db, load_config)
//! - `serve` - Web server command
//! - `users` - Account and upload history commands (register, upload, uploads)

pub mod analyze;
pub mod core;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use serve::*;
pub use users::*;
