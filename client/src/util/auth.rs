//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical redirect behavior. The auth
//! context lives in a local stored value; a `RwSignal<AuthState>` mirrors its
//! state so views and effects can track it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::guard::{self, Requirement};
use crate::session::SessionStore;
use crate::state::auth::{AuthContext, AuthState, SubscriptionId};
use crate::storage::{BrowserStorage, Storage};

/// The app's auth context, shared through Leptos context.
pub type SharedAuth = StoredValue<AuthContext<BrowserStorage>, LocalStorage>;

/// Where the guard sends the user for `state`, if anywhere.
#[must_use]
pub fn guard_redirect(state: &AuthState, requirement: Option<Requirement>) -> Option<&'static str> {
    guard::evaluate(state, requirement).redirect_target()
}

/// Navigate away whenever the guard rejects the current auth state.
pub fn install_route_guard<F>(auth: RwSignal<AuthState>, requirement: Option<Requirement>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if let Some(target) = guard_redirect(&state, requirement) {
            navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Mirror `ctx` into `auth` now and after every auth event.
pub fn bind_auth_signal<S: Storage>(ctx: &AuthContext<S>, auth: RwSignal<AuthState>) -> SubscriptionId {
    auth.set(ctx.state());
    ctx.subscribe(move |_, state| auth.set(state.clone()))
}

/// Create the auth context and signal and provide both as context.
/// The context stays loading until [`init_auth`] runs after mount.
pub fn provide_auth() -> (RwSignal<AuthState>, SharedAuth) {
    let ctx = AuthContext::new(SessionStore::new(BrowserStorage::default()));
    let auth = RwSignal::new(AuthState::default());
    bind_auth_signal(&ctx, auth);
    let shared = StoredValue::new_local(ctx);
    provide_context(auth);
    provide_context(shared);
    (auth, shared)
}

/// Mount-time rehydration. A magic-link session is then checked against
/// `/api/auth/user` and ends if the server rejects its token.
pub fn init_auth(shared: SharedAuth) {
    let state = shared.with_value(|ctx| ctx.init());
    let Some(token) = state.user.and_then(|u| u.magic_token) else {
        return;
    };

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_current_user(&token).await {
            Ok(user) => log::debug!("magic-link session verified for {}", user.email),
            Err(crate::net::api::ApiError::Unauthorized) => shared.with_value(|ctx| {
                if let Err(e) = ctx.end_rejected_session(&token) {
                    log::warn!("ending rejected session failed: {e}");
                }
            }),
            Err(e) => log::warn!("could not verify magic-link session: {e}"),
        }
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = token;
}

/// A `storage` event names the session slot, or clears all of storage
/// (`key` is null).
#[cfg(any(test, feature = "hydrate"))]
fn touches_session(key: Option<&str>) -> bool {
    key.is_none_or(|k| k == crate::session::SESSION_KEY)
}

/// Re-read the session whenever another tab changes it.
#[cfg(feature = "hydrate")]
pub fn listen_for_storage_changes(shared: SharedAuth) -> WindowListenerHandle {
    window_event_listener(leptos::ev::storage, move |ev| {
        if touches_session(ev.key().as_deref()) {
            shared.with_value(|ctx| {
                ctx.dispatch(&crate::state::auth::AuthEvent::StorageChanged);
            });
        }
    })
}
