//! Magic-link landing page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Invitation emails link to `/magic/{token}`. This page exchanges the token
//! with the server once, stores the resulting session, and forwards the user
//! to their role's home. Unknown, expired, and reused links each get their
//! own message.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

#[component]
pub fn MagicLinkPage() -> impl IntoView {
    let params = use_params_map();
    let message = RwSignal::new("Signing you in...".to_owned());

    let token = params.get_untracked().get("token").unwrap_or_default();

    #[cfg(feature = "hydrate")]
    {
        use leptos_router::NavigateOptions;

        let shared = expect_context::<crate::util::auth::SharedAuth>();
        let navigate = leptos_router::hooks::use_navigate();
        leptos::task::spawn_local(async move {
            match crate::net::api::consume_magic_link(&token).await {
                Ok(response) => match shared.with_value(|ctx| ctx.complete_magic_login(response)) {
                    Ok(redirect_to) => navigate(&redirect_to, NavigateOptions { replace: true, ..NavigateOptions::default() }),
                    Err(e) => message.set(format!("Sign-in failed: {e}")),
                },
                Err(e) => {
                    log::warn!("magic link rejected: {e}");
                    message.set(e.user_message().to_owned());
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }

    view! {
        <div class="login-page">
            <div class="login-card">
                <p class="login-message">{move || message.get()}</p>
                <a href="/login">"Back to sign in"</a>
            </div>
        </div>
    }
}
