//! Client session state.
//!
//! The session is the persisted identity record that gates navigation
//! between onboarding, login, and chat. State transitions are pure
//! functions over `Option<Session>`; [`SessionStore`] applies them and
//! writes the result through to a [`Storage`] backend.

use crate::storage::{SESSION_KEY, Storage};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Query value of the `auth` parameter that forces a signed-out start.
pub const AUTH_RESET: &str = "0";

/// Name given to a session created by [`set_role`] with no prior session.
pub const DEFAULT_NAME: &str = "Client";

/// Role carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Retail banking customer.
    Client,
}

/// The persisted identity record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role granted at onboarding or login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Department, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Client segment chosen at onboarding (e.g. `discovery`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_type: Option<String>,
}

impl Session {
    /// A session is fully authenticated when it carries both a non-empty
    /// name and a role.
    pub fn is_authenticated(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty()) && self.role.is_some()
    }
}

/// Restore a session from its persisted JSON blob.
///
/// Only fully authenticated sessions are restored; anything else,
/// including a blob that fails to parse, yields `None`.
pub fn restore(raw: Option<&str>) -> Option<Session> {
    let raw = raw?;
    let session: Session = match serde_json::from_str(raw) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("discarding unreadable session blob: {e}");
            return None;
        }
    };

    if session.is_authenticated() {
        tracing::debug!("restoring authenticated session");
        Some(session)
    } else {
        tracing::debug!("session blob incomplete, not restoring");
        None
    }
}

/// Set the role, creating a default-named session if there is none.
pub fn set_role(session: Option<Session>, role: UserRole) -> Session {
    match session {
        Some(session) => Session {
            role: Some(role),
            ..session
        },
        None => Session {
            name: Some(DEFAULT_NAME.to_owned()),
            role: Some(role),
            ..Session::default()
        },
    }
}

/// Set the department, creating a bare session if there is none.
pub fn set_department(session: Option<Session>, department: impl Into<String>) -> Session {
    Session {
        department: Some(department.into()),
        ..session.unwrap_or_default()
    }
}

/// Set the client segment, creating a bare session if there is none.
pub fn set_client_type(session: Option<Session>, client_type: impl Into<String>) -> Session {
    Session {
        client_type: Some(client_type.into()),
        ..session.unwrap_or_default()
    }
}

/// Session holder that persists every change.
pub struct SessionStore<S: Storage> {
    storage: S,
    user: Option<Session>,
}

impl<S: Storage> SessionStore<S> {
    /// Initialize from storage.
    ///
    /// `auth` is the value of the `auth` query parameter; [`AUTH_RESET`]
    /// clears any persisted session instead of restoring it.
    pub fn open(storage: S, auth: Option<&str>) -> Result<Self> {
        if auth == Some(AUTH_RESET) {
            tracing::info!("auth reset requested, clearing session");
            storage.remove(SESSION_KEY)?;
            return Ok(Self {
                storage,
                user: None,
            });
        }

        let user = restore(storage.get(SESSION_KEY).as_deref());
        Ok(Self { storage, user })
    }

    /// The current session, if any.
    pub fn user(&self) -> Option<&Session> {
        self.user.as_ref()
    }

    /// Replace the session wholesale. `None` signs out.
    pub fn set_user(&mut self, user: Option<Session>) -> Result<()> {
        match user {
            Some(user) => {
                self.persist(user)?;
            }
            None => self.logout()?,
        }
        Ok(())
    }

    pub fn set_role(&mut self, role: UserRole) -> Result<&Session> {
        tracing::debug!("setting role to {role:?}");
        let next = set_role(self.user.take(), role);
        self.persist(next)
    }

    pub fn set_department(&mut self, department: impl Into<String>) -> Result<&Session> {
        let next = set_department(self.user.take(), department);
        self.persist(next)
    }

    pub fn set_client_type(&mut self, client_type: impl Into<String>) -> Result<&Session> {
        let next = set_client_type(self.user.take(), client_type);
        self.persist(next)
    }

    /// Clear the session in memory and in storage.
    pub fn logout(&mut self) -> Result<()> {
        tracing::info!("logging out");
        self.user = None;
        self.storage.remove(SESSION_KEY)
    }

    /// Access the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self, session: Session) -> Result<&Session> {
        let blob = serde_json::to_string(&session)?;
        let session = self.user.insert(session);
        self.storage.set(SESSION_KEY, &blob)?;
        Ok(session)
    }
}
