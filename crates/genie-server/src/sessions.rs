//! In-memory login sessions keyed by bearer token
//!
//! Each token maps to a core [`Session`] (login state, current page, loaded
//! dataset). Sessions expire after a period of inactivity and are swept
//! lazily whenever a new one is created.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use tokio::sync::RwLock;
use tracing::debug;

use genie_core::{InsightEngine, Session, SessionAction, User};

/// Random bytes per token (hex encoded on the wire)
const TOKEN_BYTES: usize = 32;

#[derive(Debug)]
struct ActiveSession {
    session: Session,
    last_activity: Instant,
}

impl ActiveSession {
    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Token → session map with idle expiry
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, ActiveSession>>,
    timeout: Duration,
}

impl SessionManager {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    /// Start a session for a freshly authenticated user, returning its token
    pub async fn login(&self, user: User) -> genie_core::Result<String> {
        let mut session = Session::new();
        session.apply(SessionAction::LoggedIn(user))?;

        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let mut sessions = self.sessions.write().await;

        // Clean up expired sessions while we're here
        let timeout = self.timeout;
        sessions.retain(|_, s| !s.is_expired(timeout));

        sessions.insert(
            token.clone(),
            ActiveSession {
                session,
                last_activity: Instant::now(),
            },
        );
        debug!(active = sessions.len(), "Session created");
        Ok(token)
    }

    /// True if the token names a live session
    pub async fn is_active(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .map(|s| !s.is_expired(self.timeout))
            .unwrap_or(false)
    }

    /// Run `f` against a live session, refreshing its idle timer.
    ///
    /// Returns `None` when the token is unknown or expired.
    pub async fn with_session<R>(&self, token: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(active) if !active.is_expired(self.timeout) => {
                active.last_activity = Instant::now();
                Some(f(&mut active.session))
            }
            Some(_) => {
                sessions.remove(token);
                debug!("Session expired");
                None
            }
            None => None,
        }
    }

    /// Shared handle to a live session's dataset.
    ///
    /// The map lock is held only to clone the handle, so callers compute on
    /// the dataset without blocking other sessions. Outer `None` means the
    /// token is unknown or expired, inner `None` that nothing is loaded.
    pub async fn dataset(&self, token: &str) -> Option<Option<Arc<InsightEngine>>> {
        self.with_session(token, |session| session.shared_dataset())
            .await
    }

    /// End a session. Returns false if it was already gone.
    pub async fn logout(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(token) {
            Some(mut active) => {
                // Dropping the session discards its dataset either way
                let _ = active.session.apply(SessionAction::Logout);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use genie_core::Table;

    fn user() -> User {
        User {
            id: 1,
            username: "ana".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_creates_distinct_tokens() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let a = manager.login(user()).await.unwrap();
        let b = manager.login(user()).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(manager.is_active(&a).await);
        assert_eq!(manager.len().await, 2);
    }

    #[tokio::test]
    async fn test_with_session_and_logout() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let token = manager.login(user()).await.unwrap();

        let name = manager
            .with_session(&token, |s| s.user().map(|u| u.username.clone()))
            .await;
        assert_eq!(name, Some(Some("ana".to_string())));

        assert!(manager.logout(&token).await);
        assert!(!manager.logout(&token).await);
        assert!(manager.with_session(&token, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_dataset_handle_detached_from_map() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let token = manager.login(user()).await.unwrap();
        assert_eq!(manager.dataset(&token).await, Some(None));

        let table = Table::from_rows(vec!["Sales"], vec![vec![1.0.into()], vec![2.0.into()]])
            .unwrap();
        manager
            .with_session(&token, |s| s.load_table(&table))
            .await
            .unwrap()
            .unwrap();

        let engine = manager.dataset(&token).await.flatten().unwrap();
        // The map stays writable while a handle is out
        assert!(manager.logout(&token).await);
        assert_eq!(engine.statistics().get("Sales").unwrap().sum, 3.0);
        assert!(manager.dataset(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions() {
        let manager = SessionManager::new(Duration::ZERO);
        let token = manager.login(user()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(!manager.is_active(&token).await);
        assert!(manager.with_session(&token, |_| ()).await.is_none());
        assert_eq!(manager.len().await, 0);
    }
}
