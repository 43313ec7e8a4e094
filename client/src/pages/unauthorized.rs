//! Shown when the route guard rejects a signed-in user's role.

use leptos::prelude::*;

use crate::guard::LOGIN_PATH;
use crate::state::auth::AuthState;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let home = move || auth.get().role().map_or(LOGIN_PATH, |r| r.home_path());

    view! {
        <div class="unauthorized-page">
            <h1>"Not available"</h1>
            <p>"Your role does not have access to that page."</p>
            <a href=home>"Go to your dashboard"</a>
        </div>
    }
}
