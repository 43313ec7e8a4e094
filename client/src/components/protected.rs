//! Route guard wrapper.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::guard::{self, GuardDecision, Requirement};
use crate::state::auth::AuthState;
use crate::util::auth::install_route_guard;

/// Render `children` only while the guard allows it; otherwise redirect to
/// the login or unauthorized view. Renders nothing while auth is loading.
#[component]
pub fn Protected(requirement: Option<Requirement>, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_route_guard(auth, requirement, use_navigate());

    view! {
        <Show when=move || guard::evaluate(&auth.get(), requirement) == GuardDecision::Render>
            {children()}
        </Show>
    }
}
