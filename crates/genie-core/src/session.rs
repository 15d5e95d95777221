//! Login state machine and per-login context
//!
//! ```text
//!             ShowRegistration
//!  LoggedOut ─────────────────▶ Registering
//!      ▲  ▲ ◀───────────────────    │
//!      │  │  BackToLogin/Registered │
//!      │  │                         │
//!      │  └──────── Logout ───────┐ │
//!      │ LoggedIn(user)           │ │
//!      └──────▶ Authenticated ────┘
//! ```
//!
//! A [`Session`] carries the state plus what the logged-in user is looking
//! at: the current page and the cleaned dataset. The dataset is shared
//! behind an [`Arc`] so readers can compute on it without holding whatever
//! lock guards the session.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cleaner::CleanSummary;
use crate::error::{Error, Result};
use crate::insights::InsightEngine;
use crate::models::User;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    LoggedOut,
    Registering,
    Authenticated { user: User },
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::Registering => "registering",
            Self::Authenticated { .. } => "authenticated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    ShowRegistration,
    BackToLogin,
    Registered,
    LoggedIn(User),
    Logout,
}

impl SessionAction {
    fn name(&self) -> &'static str {
        match self {
            Self::ShowRegistration => "show_registration",
            Self::BackToLogin => "back_to_login",
            Self::Registered => "registered",
            Self::LoggedIn(_) => "logged_in",
            Self::Logout => "logout",
        }
    }
}

impl SessionState {
    /// Next state for an action, or `InvalidTransition`
    pub fn transition(self, action: SessionAction) -> Result<SessionState> {
        use SessionAction as A;
        use SessionState as S;

        match (self, action) {
            (S::LoggedOut, A::ShowRegistration) => Ok(S::Registering),
            (S::Registering, A::BackToLogin | A::Registered) => Ok(S::LoggedOut),
            (S::LoggedOut, A::LoggedIn(user)) => Ok(S::Authenticated { user }),
            (S::Authenticated { .. }, A::Logout) => Ok(S::LoggedOut),
            (state, action) => Err(Error::InvalidTransition(format!(
                "cannot {} while {}",
                action.name(),
                state.as_str()
            ))),
        }
    }
}

/// Dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Data,
    Dashboard,
    Insights,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Dashboard => "dashboard",
            Self::Insights => "insights",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "data" => Ok(Self::Data),
            "dashboard" => Ok(Self::Dashboard),
            "insights" => Ok(Self::Insights),
            _ => Err(Error::InvalidData(format!("Unknown page: {}", s))),
        }
    }
}

/// One user's interaction context
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    page: Page,
    dataset: Option<Arc<InsightEngine>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::LoggedOut
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for a user who just logged in
    pub fn authenticated(user: User) -> Self {
        Self {
            state: SessionState::Authenticated { user },
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Apply an action. Logout also drops the page and dataset.
    pub fn apply(&mut self, action: SessionAction) -> Result<()> {
        let logout = action == SessionAction::Logout;
        let current = std::mem::take(&mut self.state);
        match current.clone().transition(action) {
            Ok(next) => {
                self.state = next;
                if logout {
                    self.page = Page::default();
                    self.dataset = None;
                }
                Ok(())
            }
            Err(e) => {
                self.state = current;
                Err(e)
            }
        }
    }

    pub fn set_page(&mut self, page: Page) -> Result<()> {
        self.require_user()?;
        self.page = page;
        Ok(())
    }

    /// Clean a freshly loaded table and make it the session's dataset
    pub fn load_table(&mut self, raw: &Table) -> Result<CleanSummary> {
        self.require_user()?;
        let (engine, summary) = InsightEngine::from_raw(raw);
        self.dataset = Some(Arc::new(engine));
        Ok(summary)
    }

    /// Install an already-cleaned dataset, replacing any previous one
    pub fn set_dataset(&mut self, engine: Arc<InsightEngine>) -> Result<()> {
        self.require_user()?;
        self.dataset = Some(engine);
        Ok(())
    }

    pub fn dataset(&self) -> Option<&InsightEngine> {
        self.dataset.as_deref()
    }

    /// Handle to the dataset that stays valid after the session changes
    pub fn shared_dataset(&self) -> Option<Arc<InsightEngine>> {
        self.dataset.clone()
    }

    fn require_user(&self) -> Result<&User> {
        self.user().ok_or_else(|| {
            Error::InvalidTransition(format!("login required (currently {})", self.state.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 7,
            username: "ana".into(),
            created_at: Utc::now(),
        }
    }

    fn table() -> Table {
        Table::from_rows(
            vec!["Sales"],
            vec![vec![1.0.into()], vec![1.0.into()], vec![3.0.into()]],
        )
        .unwrap()
    }

    #[test]
    fn test_registration_flow() {
        let state = SessionState::LoggedOut
            .transition(SessionAction::ShowRegistration)
            .unwrap();
        assert_eq!(state, SessionState::Registering);

        let state = state.transition(SessionAction::Registered).unwrap();
        assert_eq!(state, SessionState::LoggedOut);

        let state = SessionState::Registering
            .transition(SessionAction::BackToLogin)
            .unwrap();
        assert_eq!(state, SessionState::LoggedOut);
    }

    #[test]
    fn test_login_logout() {
        let state = SessionState::LoggedOut
            .transition(SessionAction::LoggedIn(user()))
            .unwrap();
        assert!(matches!(&state, SessionState::Authenticated { user } if user.id == 7));
        assert_eq!(
            state.transition(SessionAction::Logout).unwrap(),
            SessionState::LoggedOut
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(matches!(
            SessionState::LoggedOut.transition(SessionAction::Logout),
            Err(Error::InvalidTransition(_))
        ));
        assert!(SessionState::Registering
            .transition(SessionAction::LoggedIn(user()))
            .is_err());
        assert!(SessionState::Authenticated { user: user() }
            .transition(SessionAction::ShowRegistration)
            .is_err());
    }

    #[test]
    fn test_failed_apply_keeps_state() {
        let mut session = Session::authenticated(user());
        assert!(session.apply(SessionAction::Registered).is_err());
        assert_eq!(session.user().map(|u| u.id), Some(7));
    }

    #[test]
    fn test_session_dataset_lifecycle() {
        let mut session = Session::new();
        assert!(session.load_table(&table()).is_err());
        assert!(session.set_page(Page::Insights).is_err());

        session.apply(SessionAction::LoggedIn(user())).unwrap();
        let summary = session.load_table(&table()).unwrap();
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(session.dataset().unwrap().table().row_count(), 2);

        session.set_page(Page::Insights).unwrap();
        assert_eq!(session.page(), Page::Insights);

        session.apply(SessionAction::Logout).unwrap();
        assert!(session.dataset().is_none());
        assert!(session.user().is_none());
        assert_eq!(session.page(), Page::Data);
    }

    #[test]
    fn test_new_table_replaces_previous() {
        let mut session = Session::authenticated(user());
        session.load_table(&table()).unwrap();

        let other = Table::from_rows(vec!["Units"], vec![vec![5.0.into()]]).unwrap();
        session.load_table(&other).unwrap();
        assert_eq!(session.dataset().unwrap().table().columns(), ["Units"]);
    }

    #[test]
    fn test_shared_dataset_outlives_replacement() {
        let mut session = Session::authenticated(user());
        session.load_table(&table()).unwrap();
        let held = session.shared_dataset().unwrap();

        let units = Table::from_rows(vec!["Units"], vec![vec![5.0.into()]]).unwrap();
        let (units, _) = InsightEngine::from_raw(&units);
        session.set_dataset(Arc::new(units)).unwrap();
        session.apply(SessionAction::Logout).unwrap();

        assert_eq!(held.table().columns(), ["Sales"]);
        assert_eq!(held.table().row_count(), 2);
        assert!(session.shared_dataset().is_none());
    }

    #[test]
    fn test_set_dataset_requires_login() {
        let (engine, _) = InsightEngine::from_raw(&table());
        let mut session = Session::new();
        assert!(matches!(
            session.set_dataset(Arc::new(engine)),
            Err(Error::InvalidTransition(_))
        ));
        assert!(session.dataset().is_none());
    }

    #[test]
    fn test_page_parse() {
        assert_eq!("Dashboard".parse::<Page>().unwrap(), Page::Dashboard);
        assert!("settings".parse::<Page>().is_err());
    }
}
