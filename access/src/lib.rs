//! Shared role and capability model for the dashboard access layer.
//!
//! This crate owns the role vocabulary used by both `server` and `client`.
//! Authorization is expressed as a static role -> capability table so that
//! admin elevation and multi-role access are declared in one place rather
//! than special-cased per route.

pub mod capability;
pub mod role;

pub use capability::Capability;
pub use role::{Role, UnknownRole};
