//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read auth state from Leptos context providers; pages compose
//! them.

pub mod nav_menu;
pub mod protected;
