//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering.
//!
//! DESIGN
//! ======
//! [`AuthContext`] is the single source of truth for who is logged in. It is
//! a cache over the session store: every [`AuthEvent`] re-reads the slot,
//! replaces the cached [`AuthState`], and notifies subscribers. Session
//! changes go through the context's own methods, which write the store and
//! then publish the matching event. Changes made by another tab arrive as
//! [`AuthEvent::StorageChanged`].
//!
//! ERROR HANDLING
//! ==============
//! Rehydration is fail-closed: a storage failure is logged and the context
//! reports no user.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use access::{Capability, Role};

use crate::net::types::MagicLinkResponse;
use crate::session::{Actor, SessionStore, UserSession, now_millis};
use crate::storage::{Storage, StorageError};

/// Authentication state tracking the current user and loading status.
///
/// `loading` is true until the first rehydration finishes; guards must not
/// treat `user == None` as "logged out" before then.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserSession>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl AuthState {
    #[must_use]
    pub fn resolved(user: Option<UserSession>) -> Self {
        Self { user, loading: false }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Every reason the auth context re-reads the session slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// First read at application start.
    Mounted,
    /// The slot changed outside this context (another tab).
    StorageChanged,
    LoggedIn,
    RoleSwitched(Role),
    Impersonated { email: String },
    ImpersonationEnded,
    LoggedOut,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("{role} lacks {capability:?}")]
    Forbidden { role: Role, capability: Capability },
    #[error("not impersonating anyone")]
    NotImpersonating,
    #[error("session requires a non-empty email and name")]
    InvalidSession,
}

/// Handle returned by [`AuthContext::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AuthEvent, &AuthState)>;

// =============================================================================
// CONTEXT
// =============================================================================

pub struct AuthContext<S> {
    store: SessionStore<S>,
    state: RefCell<AuthState>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    /// Unsubscribed while their listener list was checked out by `drain`.
    dropped: RefCell<Vec<SubscriptionId>>,
    /// Events waiting for delivery, in dispatch order.
    pending: RefCell<VecDeque<(AuthEvent, AuthState)>>,
    draining: Cell<bool>,
    next_id: Cell<u64>,
}

impl<S: Storage> AuthContext<S> {
    /// A context in the loading state. Call [`AuthContext::init`] once the
    /// app is mounted.
    pub fn new(store: SessionStore<S>) -> Self {
        Self {
            store,
            state: RefCell::new(AuthState::default()),
            listeners: RefCell::new(Vec::new()),
            dropped: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            next_id: Cell::new(0),
        }
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Snapshot of the cached state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Mount-time rehydration.
    pub fn init(&self) -> AuthState {
        self.dispatch(&AuthEvent::Mounted)
    }

    /// Re-read the session slot, cache the result, and notify subscribers.
    ///
    /// Called from inside a listener, the event is queued and delivered to
    /// every subscriber once the current event has reached them all.
    pub fn dispatch(&self, event: &AuthEvent) -> AuthState {
        let next = self.rehydrate();
        self.state.replace(next.clone());
        log::debug!("auth event {event:?}: authenticated={}", next.is_authenticated());
        self.pending.borrow_mut().push_back((event.clone(), next.clone()));
        if !self.draining.replace(true) {
            self.drain();
            self.draining.set(false);
        }
        next
    }

    fn rehydrate(&self) -> AuthState {
        match self.store.load() {
            Ok(user) => AuthState::resolved(user),
            Err(e) => {
                log::warn!("session rehydration failed, treating as logged out: {e}");
                AuthState::resolved(None)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    pub fn subscribe(&self, listener: impl FnMut(&AuthEvent, &AuthState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        if listeners.len() == before && self.draining.get() {
            self.dropped.borrow_mut().push(id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver queued events in order. Listeners are checked out while they
    /// run so they may call back into the context without a `RefCell`
    /// double borrow. A listener unsubscribed mid-pass is skipped from then
    /// on, and one subscribed mid-pass starts with the next queued event.
    fn drain(&self) {
        loop {
            let Some((event, state)) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let mut active = self.listeners.take();
            for (id, listener) in &mut active {
                if !self.dropped.borrow().contains(id) {
                    listener(&event, &state);
                }
            }
            let dropped = self.dropped.take();
            active.retain(|(id, _)| !dropped.contains(id));
            let mut listeners = self.listeners.borrow_mut();
            let added = std::mem::take(&mut *listeners);
            *listeners = active;
            listeners.extend(added);
        }
    }

    // -------------------------------------------------------------------------
    // Session operations
    // -------------------------------------------------------------------------

    /// Store `session` and publish [`AuthEvent::LoggedIn`].
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidSession`] for a blank email or name, or
    /// [`AuthError::Storage`] when the slot cannot be written.
    pub fn login(&self, session: UserSession) -> Result<AuthState, AuthError> {
        if session.email.trim().is_empty() || session.name.trim().is_empty() {
            return Err(AuthError::InvalidSession);
        }
        self.store.set(&session)?;
        Ok(self.dispatch(&AuthEvent::LoggedIn))
    }

    /// Store the session from a consumed magic link. Returns the path to
    /// navigate to.
    ///
    /// # Errors
    ///
    /// Same as [`AuthContext::login`].
    pub fn complete_magic_login(&self, response: MagicLinkResponse) -> Result<String, AuthError> {
        let redirect_to = response.redirect_to.clone();
        self.login(response.into_session(now_millis()))?;
        Ok(redirect_to)
    }

    /// Act as `role` for the rest of the session.
    ///
    /// Leaving one's own role records the real user in `impersonated_by`, so
    /// an admin viewing the builder dashboard can still switch back.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session, and
    /// [`AuthError::Forbidden`] when the session's authority cannot reach
    /// `role`'s dashboard.
    pub fn switch_role(&self, role: Role) -> Result<AuthState, AuthError> {
        let mut session = self.store.current().ok_or(AuthError::NotLoggedIn)?;
        let actor = session.impersonated_by.clone().unwrap_or_else(|| Actor {
            email: session.email.clone(),
            name: session.name.clone(),
            role: session.role,
        });
        if !actor.role.can_act_as(role) {
            return Err(AuthError::Forbidden { role: actor.role, capability: role.dashboard() });
        }
        let back_to_self = actor.email == session.email && actor.role == role;
        session.role = role;
        session.impersonated_by = if back_to_self { None } else { Some(actor) };
        self.store.set(&session)?;
        Ok(self.dispatch(&AuthEvent::RoleSwitched(role)))
    }

    /// Replace the session with `target`'s, remembering who did it.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session, and
    /// [`AuthError::Forbidden`] unless the session's authority holds
    /// [`Capability::ImpersonateUsers`].
    pub fn impersonate(&self, target: Actor) -> Result<AuthState, AuthError> {
        let current = self.store.current().ok_or(AuthError::NotLoggedIn)?;
        let authority = current.authority();
        if !authority.can(Capability::ImpersonateUsers) {
            return Err(AuthError::Forbidden { role: authority, capability: Capability::ImpersonateUsers });
        }
        let actor = current.impersonated_by.unwrap_or(Actor {
            email: current.email,
            name: current.name,
            role: current.role,
        });
        let email = target.email.clone();
        let mut session = UserSession::new(target.email, target.name, target.role, now_millis());
        session.impersonated_by = Some(actor);
        self.store.set(&session)?;
        Ok(self.dispatch(&AuthEvent::Impersonated { email }))
    }

    /// Return to the impersonating user's own session.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotLoggedIn`] without a session and
    /// [`AuthError::NotImpersonating`] for an ordinary session.
    pub fn stop_impersonating(&self) -> Result<AuthState, AuthError> {
        let current = self.store.current().ok_or(AuthError::NotLoggedIn)?;
        let actor = current.impersonated_by.ok_or(AuthError::NotImpersonating)?;
        let session = UserSession::new(actor.email, actor.name, actor.role, now_millis());
        self.store.set(&session)?;
        Ok(self.dispatch(&AuthEvent::ImpersonationEnded))
    }

    /// Log out if the stored session still carries `token`, which the server
    /// has stopped accepting. Returns `None` when the session has since
    /// changed and was left alone.
    ///
    /// # Errors
    ///
    /// Same as [`AuthContext::logout`].
    pub fn end_rejected_session(&self, token: &str) -> Result<Option<AuthState>, AuthError> {
        let holds_token = self
            .store
            .current()
            .is_some_and(|s| s.magic_token.as_deref() == Some(token));
        if !holds_token {
            return Ok(None);
        }
        log::warn!("magic-link token no longer accepted; logging out");
        self.logout().map(Some)
    }

    /// Erase the session slot and publish [`AuthEvent::LoggedOut`].
    ///
    /// # Errors
    ///
    /// [`AuthError::Storage`] when the slot cannot be cleared.
    pub fn logout(&self) -> Result<AuthState, AuthError> {
        self.store.clear()?;
        Ok(self.dispatch(&AuthEvent::LoggedOut))
    }
}
