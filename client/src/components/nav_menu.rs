//! Sidebar navigation for the signed-in role, with session controls.

#[cfg(test)]
#[path = "nav_menu_test.rs"]
mod nav_menu_test;

use access::Role;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::nav::{self, NavItem};
use crate::state::auth::AuthState;
use crate::util::auth::SharedAuth;

fn menu_items(state: &AuthState) -> Vec<&'static NavItem> {
    state.role().map(nav::resolve_role).unwrap_or_default()
}

/// Roles the session's real user may view the dashboard as. A single entry
/// means there is nothing to switch to.
fn switchable_roles(state: &AuthState) -> Vec<Role> {
    let Some(user) = state.user.as_ref() else {
        return Vec::new();
    };
    let authority = user.authority();
    Role::ALL.into_iter().filter(|r| authority.can_act_as(*r)).collect()
}

/// "Name (role)", plus who is really driving an impersonated session.
fn identity_label(state: &AuthState) -> Option<String> {
    let user = state.user.as_ref()?;
    let mut label = format!("{} ({})", user.name, user.role);
    if let Some(actor) = &user.impersonated_by {
        if actor.email != user.email {
            label.push_str(&format!(" via {}", actor.name));
        }
    }
    Some(label)
}

#[component]
pub fn NavMenu() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let shared = expect_context::<SharedAuth>();

    let on_logout = move |_| {
        shared.with_value(|ctx| {
            if let Err(e) = ctx.logout() {
                log::warn!("logout failed: {e}");
            }
        });
    };
    let navigate = use_navigate();
    let on_switch_role = move |ev: leptos::ev::Event| {
        let Ok(role) = event_target_value(&ev).parse::<Role>() else {
            return;
        };
        match shared.with_value(|ctx| ctx.switch_role(role)) {
            Ok(_) => navigate(role.home_path(), NavigateOptions::default()),
            Err(e) => log::warn!("role switch failed: {e}"),
        }
    };
    let on_stop_impersonating = move |_| {
        shared.with_value(|ctx| {
            if let Err(e) = ctx.stop_impersonating() {
                log::warn!("stop impersonating failed: {e}");
            }
        });
    };

    view! {
        <nav class="nav-menu">
            {move || {
                let items = menu_items(&auth.get());
                if items.is_empty() {
                    view! { <p class="nav-menu__empty">{nav::fallback_message()}</p> }.into_any()
                } else {
                    view! {
                        <ul class="nav-menu__list">
                            {items
                                .into_iter()
                                .map(|item| {
                                    view! {
                                        <li>
                                            <a href=item.path data-icon=item.icon>
                                                {item.label}
                                            </a>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                        .into_any()
                }
            }}
            <div class="nav-menu__footer">
                <span class="nav-menu__identity">{move || identity_label(&auth.get())}</span>
                <select
                    class="nav-menu__role"
                    hidden=move || switchable_roles(&auth.get()).len() < 2
                    prop:value=move || auth.get().role().map(Role::as_str).unwrap_or_default()
                    on:change=on_switch_role
                >
                    {move || {
                        switchable_roles(&auth.get())
                            .into_iter()
                            .map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> })
                            .collect_view()
                    }}
                </select>
                <Show when=move || auth.get().user.is_some_and(|u| u.is_impersonating())>
                    <button class="btn" on:click=on_stop_impersonating>
                        "Return to my account"
                    </button>
                </Show>
                <button class="btn" on:click=on_logout>
                    "Log out"
                </button>
            </div>
        </nav>
    }
}
