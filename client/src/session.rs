//! Session store: the single persisted user-session slot.
//!
//! DESIGN
//! ======
//! One JSON record lives under [`SESSION_KEY`]. Reads never fail from the
//! caller's point of view: a missing slot, an unreadable backend, malformed
//! JSON, or a record with missing fields all read as "no session". Sessions
//! carry no TTL; they last until logout.
//!
//! The store only reads and writes. Publishing the change to the rest of the
//! app is the auth context's job (see `state::auth`).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use access::Role;
use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError};

/// Storage key holding the serialized [`UserSession`].
pub const SESSION_KEY: &str = "propdash.session";

/// The real person behind an impersonated session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Epoch milliseconds.
    pub login_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonated_by: Option<Actor>,
    /// Bearer credential from a magic-link login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic_token: Option<String>,
}

impl UserSession {
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role, login_time: i64) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
            login_time,
            project_id: None,
            impersonated_by: None,
            magic_token: None,
        }
    }

    /// Role whose capabilities govern session-management actions: the
    /// impersonating admin's, when there is one.
    #[must_use]
    pub fn authority(&self) -> Role {
        self.impersonated_by.as_ref().map_or(self.role, |actor| actor.role)
    }

    #[must_use]
    pub fn is_impersonating(&self) -> bool {
        self.impersonated_by.is_some()
    }
}

/// Whether `raw` decodes into a [`UserSession`] with a non-empty `email`
/// and `name`. Optional fields must be well-formed when present.
#[must_use]
pub fn is_valid_session_json(raw: &str) -> bool {
    parse_session(raw).is_some()
}

fn parse_session(raw: &str) -> Option<UserSession> {
    let session = serde_json::from_str::<UserSession>(raw).ok()?;
    let filled = |s: &str| !s.trim().is_empty();
    (filled(&session.email) && filled(&session.name)).then_some(session)
}

// =============================================================================
// STORE
// =============================================================================

/// Reader/writer for the session slot over an injected [`Storage`].
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the slot, surfacing backend failures. Malformed records are
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read.
    pub fn load(&self) -> Result<Option<UserSession>, StorageError> {
        Ok(self.storage.get(SESSION_KEY)?.as_deref().and_then(parse_session))
    }

    /// The current session, or `None` for any failure.
    pub fn current(&self) -> Option<UserSession> {
        self.load().ok().flatten()
    }

    /// Whether the slot holds a structurally valid record. No expiry check.
    pub fn is_valid(&self) -> bool {
        self.storage
            .get(SESSION_KEY)
            .ok()
            .flatten()
            .is_some_and(|raw| is_valid_session_json(&raw))
    }

    /// Overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the write.
    pub fn set(&self, session: &UserSession) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session).map_err(|_| StorageError::WriteFailed(SESSION_KEY.to_owned()))?;
        self.storage.set(SESSION_KEY, &raw)
    }

    /// Erase the slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the removal.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let now = js_sys::Date::now() as i64;
        now
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}
