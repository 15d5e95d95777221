//! Persisted records for DataGenie

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The password hash never leaves the db layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// An upload about to be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    pub filename: String,
    pub size_bytes: u64,
    /// SHA-256 of the raw file, hex encoded
    pub content_hash: String,
}

impl NewUpload {
    /// Describe raw upload bytes
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Self {
        Self {
            filename: filename.to_string(),
            size_bytes: bytes.len() as u64,
            content_hash: crate::loader::content_hash(bytes),
        }
    }
}

/// A recorded upload ("Previous Uploads")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub size_bytes: u64,
    pub content_hash: String,
    pub uploaded_at: DateTime<Utc>,
}
