//! Login page: pick an identity and role for this browser session.
//!
//! Invited users normally arrive through a magic link instead; this form is
//! the direct path for staff accounts.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use access::Role;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::session::{UserSession, now_millis};
use crate::util::auth::SharedAuth;

fn build_session(email: &str, name: &str, role: &str, now: i64) -> Result<UserSession, String> {
    let email = email.trim();
    let name = name.trim();
    if email.is_empty() || name.is_empty() {
        return Err("Enter your name and email.".to_owned());
    }
    let role = role.parse::<Role>().map_err(|e| e.to_string())?;
    Ok(UserSession::new(email, name, role, now))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let shared = expect_context::<SharedAuth>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Builder.as_str().to_owned());
    let info = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let session = match build_session(&email.get(), &name.get(), &role.get(), now_millis()) {
            Ok(session) => session,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        let home = session.role.home_path();
        match shared.with_value(|ctx| ctx.login(session)) {
            Ok(_) => navigate(home, NavigateOptions::default()),
            Err(e) => info.set(format!("Login failed: {e}")),
        }
    };

    view! {
        <div class="login-page">
            <form class="login-card" on:submit=on_submit>
                <h1>"propdash"</h1>
                <input
                    class="login-input"
                    type="text"
                    placeholder="Name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    class="login-input"
                    type="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <select
                    class="login-input"
                    prop:value=move || role.get()
                    on:change=move |ev| role.set(event_target_value(&ev))
                >
                    {Role::ALL
                        .into_iter()
                        .map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> })
                        .collect_view()}
                </select>
                <button class="btn btn--primary" type="submit">
                    "Sign in"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </form>
        </div>
    }
}
