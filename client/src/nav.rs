//! Role-based navigation.
//!
//! DESIGN
//! ======
//! [`REGISTRY`] is static configuration. Each entry names the capability that
//! guards its route, and its `roles` list is exactly the set of roles holding
//! that capability, so a link is visible iff following it would pass the
//! route guard. Resolution is a filter over the registry in order.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use access::{Capability, Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    /// Icon name from the app's icon set.
    pub icon: &'static str,
    pub roles: &'static [Role],
    pub capability: Capability,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

pub const REGISTRY: &[NavItem] = &[
    NavItem {
        path: "/admin",
        label: "Overview",
        icon: "shield",
        roles: ADMIN_ONLY,
        capability: Capability::AdminDashboard,
    },
    NavItem {
        path: "/admin/team",
        label: "Team",
        icon: "users",
        roles: ADMIN_ONLY,
        capability: Capability::ManageTeam,
    },
    NavItem {
        path: "/admin/audit",
        label: "Audit Log",
        icon: "scroll",
        roles: ADMIN_ONLY,
        capability: Capability::ViewAuditLog,
    },
    NavItem {
        path: "/builder",
        label: "Builder Dashboard",
        icon: "hammer",
        roles: &[Role::Admin, Role::Builder],
        capability: Capability::BuilderDashboard,
    },
    NavItem {
        path: "/projects",
        label: "Projects",
        icon: "building",
        roles: &[Role::Admin, Role::Builder],
        capability: Capability::ManageProjects,
    },
    NavItem {
        path: "/claims",
        label: "Progress Claims",
        icon: "file-text",
        roles: &[Role::Admin, Role::Builder],
        capability: Capability::SubmitClaims,
    },
    NavItem {
        path: "/claims/approvals",
        label: "Claim Approvals",
        icon: "check-circle",
        roles: &[Role::Admin, Role::Client],
        capability: Capability::ApproveClaims,
    },
    NavItem {
        path: "/client",
        label: "My Project",
        icon: "home",
        roles: &[Role::Admin, Role::Client],
        capability: Capability::ClientDashboard,
    },
    NavItem {
        path: "/receipts",
        label: "Receipts",
        icon: "receipt",
        roles: &[Role::Admin, Role::Builder, Role::Accountant],
        capability: Capability::ManageReceipts,
    },
    NavItem {
        path: "/accountant",
        label: "Accounts",
        icon: "calculator",
        roles: &[Role::Admin, Role::Accountant],
        capability: Capability::AccountantDashboard,
    },
    NavItem {
        path: "/accounting/xero",
        label: "Xero Sync",
        icon: "refresh-cw",
        roles: &[Role::Admin, Role::Accountant],
        capability: Capability::SyncAccounting,
    },
    NavItem {
        path: "/investor",
        label: "Portfolio",
        icon: "pie-chart",
        roles: &[Role::Admin, Role::Investor],
        capability: Capability::InvestorDashboard,
    },
    NavItem {
        path: "/investments",
        label: "Investments",
        icon: "trending-up",
        roles: &[Role::Admin, Role::Investor],
        capability: Capability::ViewInvestments,
    },
];

/// Navigation for a role name. Unknown names get an empty list.
#[must_use]
pub fn resolve(role: &str) -> Vec<&'static NavItem> {
    role.parse::<Role>().map_or_else(|_| Vec::new(), resolve_role)
}

/// Registry entries visible to `role`, in registry order.
#[must_use]
pub fn resolve_role(role: Role) -> Vec<&'static NavItem> {
    REGISTRY.iter().filter(|item| item.roles.contains(&role)).collect()
}

/// The entry whose path is the longest segment-aligned prefix of `path`.
#[must_use]
pub fn item_for_path(path: &str) -> Option<&'static NavItem> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    REGISTRY
        .iter()
        .filter(|item| {
            path.strip_prefix(item.path)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
        .max_by_key(|item| item.path.len())
}

/// Shown in place of the menu when a role resolves to nothing.
#[must_use]
pub fn fallback_message() -> &'static str {
    "No navigation is available for your account. Contact an administrator."
}
