//! Root component: auth providers and routes.
//!
//! ARCHITECTURE
//! ============
//! `App` creates the auth context once, mirrors it into a signal, and
//! rehydrates it after mount. Route guarding happens per page through
//! `Protected`; every dashboard section shares the catch-all route, whose
//! requirement comes from the navigation registry.

use access::Capability;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::components::protected::Protected;
use crate::guard::{LOGIN_PATH, Requirement};
use crate::pages::login::LoginPage;
use crate::pages::magic::MagicLinkPage;
use crate::pages::section::SectionPage;
use crate::pages::team::TeamPage;
use crate::pages::unauthorized::UnauthorizedPage;
use crate::state::auth::AuthState;
use crate::util::auth::{init_auth, provide_auth};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let (_auth, shared) = provide_auth();

    // Runs after mount; until then guards see the loading state.
    Effect::new(move || init_auth(shared));

    // The root lives as long as the page, so the listener is never removed.
    #[cfg(feature = "hydrate")]
    let _storage_listener = crate::util::auth::listen_for_storage_changes(shared);

    view! {
        <Title text="propdash" />
        <Router>
            <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                <Route path=path!("/") view=HomeRedirect />
                <Route path=path!("/login") view=LoginPage />
                <Route path=path!("/magic/:token") view=MagicLinkPage />
                <Route path=path!("/unauthorized") view=UnauthorizedPage />
                <Route
                    path=path!("/admin/team")
                    view=|| {
                        view! {
                            <Protected requirement=Some(Requirement::Capability(Capability::ManageTeam))>
                                <TeamPage />
                            </Protected>
                        }
                    }
                />
                <Route path=path!("/*any") view=SectionPage />
            </Routes>
        </Router>
    }
}

/// `/` sends signed-in users to their role's home and everyone else to login.
#[component]
fn HomeRedirect() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    move || {
        let state = auth.get();
        if state.loading {
            return None;
        }
        let target = state.role().map_or(LOGIN_PATH, |r| r.home_path());
        Some(view! { <Redirect path=target /> })
    }
}
