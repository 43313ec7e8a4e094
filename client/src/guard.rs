//! Route guard decisions.
//!
//! DESIGN
//! ======
//! [`evaluate`] is a pure function of the auth state and the route's
//! requirement. A role requirement is checked as that role's dashboard
//! capability, so admin access to other dashboards comes from the capability
//! table and never from a per-route special case. Failing the requirement is
//! a silent redirect; no error reaches the user.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use access::{Capability, Role};

use crate::nav;
use crate::state::auth::AuthState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// What a protected route asks of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Role(Role),
    Capability(Capability),
}

impl Requirement {
    #[must_use]
    pub fn capability(self) -> Capability {
        match self {
            Self::Role(role) => role.dashboard(),
            Self::Capability(cap) => cap,
        }
    }

    #[must_use]
    pub fn is_met_by(self, role: Role) -> bool {
        role.can(self.capability())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth has not finished loading; render nothing yet.
    Pending,
    RedirectLogin,
    RedirectUnauthorized,
    Render,
}

impl GuardDecision {
    #[must_use]
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::RedirectLogin => Some(LOGIN_PATH),
            Self::RedirectUnauthorized => Some(UNAUTHORIZED_PATH),
            Self::Pending | Self::Render => None,
        }
    }
}

#[must_use]
pub fn evaluate(auth: &AuthState, requirement: Option<Requirement>) -> GuardDecision {
    if auth.loading {
        return GuardDecision::Pending;
    }
    let Some(user) = &auth.user else {
        return GuardDecision::RedirectLogin;
    };
    match requirement {
        Some(req) if !req.is_met_by(user.role) => GuardDecision::RedirectUnauthorized,
        _ => GuardDecision::Render,
    }
}

/// Requirement for a routed path, taken from the navigation registry.
/// Paths outside the registry only require a session.
#[must_use]
pub fn requirement_for_path(path: &str) -> Option<Requirement> {
    nav::item_for_path(path).map(|item| Requirement::Capability(item.capability))
}
