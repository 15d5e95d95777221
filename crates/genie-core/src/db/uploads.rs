//! Upload history

use rusqlite::params;

use super::{is_constraint_violation, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewUpload, UploadRecord};

impl Database {
    /// Record an upload for a user
    pub fn record_upload(&self, user_id: i64, upload: &NewUpload) -> Result<i64> {
        let conn = self.conn()?;
        match conn.execute(
            "INSERT INTO uploads (user_id, filename, size_bytes, content_hash) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                upload.filename,
                upload.size_bytes as i64,
                upload.content_hash
            ],
        ) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                tracing::debug!(upload_id = id, user_id, filename = %upload.filename, "Upload recorded");
                Ok(id)
            }
            Err(e) if is_constraint_violation(&e) => {
                Err(Error::NotFound(format!("User {} not found", user_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's uploads, newest first
    pub fn list_uploads(&self, user_id: i64) -> Result<Vec<UploadRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, filename, size_bytes, content_hash, uploaded_at
             FROM uploads
             WHERE user_id = ?
             ORDER BY uploaded_at DESC, id DESC",
        )?;

        let uploads = stmt
            .query_map(params![user_id], |row| {
                let size: i64 = row.get(3)?;
                let uploaded_at: String = row.get(5)?;
                Ok(UploadRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    filename: row.get(2)?,
                    size_bytes: size.max(0) as u64,
                    content_hash: row.get(4)?,
                    uploaded_at: parse_datetime(&uploaded_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(uploads)
    }
}
