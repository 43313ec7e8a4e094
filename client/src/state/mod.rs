//! Client state held in Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the logged-in user and the event channel that keeps every view
//! in agreement about it.

pub mod auth;
