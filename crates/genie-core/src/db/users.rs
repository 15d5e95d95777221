//! User registration and login

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use super::{is_constraint_violation, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Encryption(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| Error::Encryption(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl Database {
    /// Register a new user, returning its ID
    pub fn create_user(&self, username: &str, password: &str) -> Result<i64> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidData("Username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(Error::InvalidData("Password must not be empty".into()));
        }

        let hash = hash_password(password)?;
        let conn = self.conn()?;
        match conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)",
            params![username, hash],
        ) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                info!(user_id = id, username, "User registered");
                Ok(id)
            }
            Err(e) if is_constraint_violation(&e) => Err(Error::Conflict(format!(
                "Username '{}' already exists",
                username
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials. Unknown users and wrong passwords both yield `None`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
                params![username.trim()],
                |row| {
                    let created_at: String = row.get(3)?;
                    Ok((
                        User {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            created_at: parse_datetime(&created_at),
                        },
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((user, stored)) = row else {
            debug!("Login attempt for unknown user");
            return Ok(None);
        };

        if verify_password(password, &stored)? {
            Ok(Some(user))
        } else {
            debug!(user_id = user.id, "Password mismatch");
            Ok(None)
        }
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?",
                params![id],
                |row| {
                    let created_at: String = row.get(2)?;
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: parse_datetime(&created_at),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}
