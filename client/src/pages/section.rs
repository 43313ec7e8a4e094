//! Catch-all page for every registered dashboard section.
//!
//! The route's requirement comes from the navigation registry, so a section
//! is reachable by exactly the roles that see its link.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::components::nav_menu::NavMenu;
use crate::components::protected::Protected;
use crate::guard;
use crate::nav;

fn section_title(path: &str) -> &'static str {
    nav::item_for_path(path).map_or("Dashboard", |item| item.label)
}

#[component]
pub fn SectionPage() -> impl IntoView {
    let location = use_location();

    move || {
        let path = location.pathname.get();
        let requirement = guard::requirement_for_path(&path);
        let title = section_title(&path);
        view! {
            <Protected requirement=requirement>
                <div class="dashboard-layout">
                    <NavMenu />
                    <main class="dashboard-main">
                        <h1>{title}</h1>
                    </main>
                </div>
            </Protected>
        }
    }
}
