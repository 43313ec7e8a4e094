//! Capability table.
//!
//! DESIGN
//! ======
//! Guards consult capabilities, never role equality. A role reaches another
//! role's routes only when the table grants it that role's dashboard
//! capability, so admin elevation is a row in this table rather than a
//! conditional in route code.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A named permission checked by route guards and API handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    AdminDashboard,
    BuilderDashboard,
    ClientDashboard,
    AccountantDashboard,
    InvestorDashboard,
    /// Invite, resend, and revoke team members.
    ManageTeam,
    /// Switch into another user's session.
    ImpersonateUsers,
    /// Trigger the invitation expiry sweep by hand.
    CleanupInvitations,
    ManageProjects,
    SubmitClaims,
    ApproveClaims,
    ManageReceipts,
    SyncAccounting,
    ViewInvestments,
    ViewAuditLog,
}

const ADMIN: &[Capability] = &[
    Capability::AdminDashboard,
    Capability::BuilderDashboard,
    Capability::ClientDashboard,
    Capability::AccountantDashboard,
    Capability::InvestorDashboard,
    Capability::ManageTeam,
    Capability::ImpersonateUsers,
    Capability::CleanupInvitations,
    Capability::ManageProjects,
    Capability::SubmitClaims,
    Capability::ApproveClaims,
    Capability::ManageReceipts,
    Capability::SyncAccounting,
    Capability::ViewInvestments,
    Capability::ViewAuditLog,
];

const BUILDER: &[Capability] = &[
    Capability::BuilderDashboard,
    Capability::ManageProjects,
    Capability::SubmitClaims,
    Capability::ManageReceipts,
];

const CLIENT: &[Capability] = &[Capability::ClientDashboard, Capability::ApproveClaims];

const ACCOUNTANT: &[Capability] = &[
    Capability::AccountantDashboard,
    Capability::ManageReceipts,
    Capability::SyncAccounting,
];

const INVESTOR: &[Capability] = &[Capability::InvestorDashboard, Capability::ViewInvestments];

/// Capabilities granted to `role`.
#[must_use]
pub fn grants(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => ADMIN,
        Role::Builder => BUILDER,
        Role::Client => CLIENT,
        Role::Accountant => ACCOUNTANT,
        Role::Investor => INVESTOR,
    }
}

/// Roles holding `cap`, in [`Role::ALL`] order.
#[must_use]
pub fn holders(cap: Capability) -> Vec<Role> {
    Role::ALL.into_iter().filter(|role| role.can(cap)).collect()
}

#[cfg(test)]
#[path = "capability_test.rs"]
mod tests;
