//! Team page: invite members by magic link, view the dashboard as one of
//! them, and expire stale invitations.

#[cfg(test)]
#[path = "team_test.rs"]
mod team_test;

use access::Role;
use leptos::prelude::*;

use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::nav_menu::NavMenu;
use crate::net::types::{InviteRequest, TeamMember};
use crate::state::auth::AuthState;
use crate::util::auth::SharedAuth;

fn build_invite(name: &str, email: &str, role: &str, project_id: &str, created_by: &str) -> Result<InviteRequest, String> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err("Name is required.".to_owned());
    }
    if !email.contains('@') {
        return Err("Enter a valid email.".to_owned());
    }
    let role = role.parse::<Role>().map_err(|e| e.to_string())?;
    let project_id = Some(project_id.trim()).filter(|p| !p.is_empty()).map(str::to_owned);
    Ok(InviteRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        project_id,
        created_by: created_by.to_owned(),
    })
}

fn member_label(member: &TeamMember) -> String {
    format!("{} <{}> {} ({})", member.name, member.email, member.role, member.status)
}

#[component]
pub fn TeamPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let shared = expect_context::<SharedAuth>();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Builder.as_str().to_owned());
    let project = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let last_link = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let members = RwSignal::new(Vec::<TeamMember>::new());
    let view_as_home = RwSignal::new(None::<&'static str>);

    let refresh_members = move || {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::list_invitations().await {
                Ok(list) => members.set(list),
                Err(e) => log::warn!("loading invitations failed: {e}"),
            }
        });
    };
    Effect::new(move || refresh_members());

    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(home) = view_as_home.get() {
            navigate(home, NavigateOptions::default());
        }
    });

    let on_view_as = move |member: TeamMember| {
        match shared.with_value(|ctx| ctx.impersonate(member.as_actor())) {
            Ok(_) => view_as_home.set(Some(member.role.home_path())),
            Err(e) => info.set(format!("Cannot view as {}: {e}", member.name)),
        }
    };

    let on_invite = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let created_by = auth.get().user.map(|u| u.email).unwrap_or_default();
        let request = match build_invite(&name.get(), &email.get(), &role.get(), &project.get(), &created_by) {
            Ok(request) => request,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        busy.set(true);
        info.set("Sending invitation...".to_owned());
        last_link.set(None);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::send_invite(&request).await {
                Ok(invitation) => {
                    info.set(format!("Invitation sent to {}. Link expires {}.", invitation.email, invitation.expires_at));
                    last_link.set(Some(invitation.magic_link));
                    refresh_members();
                    name.set(String::new());
                    email.set(String::new());
                    project.set(String::new());
                }
                Err(e) => info.set(format!("Invite failed: {e}")),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            busy.set(false);
        }
    };

    let on_cleanup = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::cleanup_invitations().await {
                Ok(message) => info.set(message),
                Err(e) => info.set(format!("Cleanup failed: {e}")),
            }
        });
    };

    view! {
        <div class="dashboard-layout">
            <NavMenu />
            <main class="dashboard-main">
                <h1>"Team"</h1>
                <form class="team-invite" on:submit=on_invite>
                    <input
                        type="text"
                        placeholder="Full name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <input
                        type="email"
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <select prop:value=move || role.get() on:change=move |ev| role.set(event_target_value(&ev))>
                        {Role::ALL
                            .into_iter()
                            .map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <input
                        type="text"
                        placeholder="Project (optional)"
                        prop:value=move || project.get()
                        on:input=move |ev| project.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        "Send invitation"
                    </button>
                </form>
                <button class="btn" on:click=on_cleanup>
                    "Expire stale invitations"
                </button>
                <p class="team-message">{move || info.get()}</p>
                <Show when=move || last_link.get().is_some()>
                    <code class="team-link">{move || last_link.get().unwrap_or_default()}</code>
                </Show>
                <ul class="team-members">
                    {move || {
                        members
                            .get()
                            .into_iter()
                            .map(|member| {
                                let label = member_label(&member);
                                view! {
                                    <li>
                                        <span>{label}</span>
                                        <button class="btn" on:click=move |_| on_view_as(member.clone())>
                                            "View as"
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </main>
        </div>
    }
}
