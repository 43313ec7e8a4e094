//! propdash browser client: session store, auth context, role-based
//! navigation, and route guards.
//!
//! ARCHITECTURE
//! ============
//! The non-UI layers (`storage`, `session`, `state::auth`, `nav`, `guard`)
//! are plain Rust and test natively. `util::auth`, `components`, `pages`, and
//! `app` bind them to Leptos. Browser-only code sits behind the `hydrate`
//! feature.

pub mod app;
pub mod components;
pub mod guard;
pub mod nav;
pub mod net;
pub mod pages;
pub mod session;
pub mod state;
pub mod storage;
pub mod util;

/// WASM entry point, run when `index.html` loads the bundle. The page
/// body starts empty and the app mounts into it.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
