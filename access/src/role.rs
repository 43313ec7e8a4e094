//! User roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capability::{self, Capability};

/// Error returned when a string does not name a known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

/// One of the fixed user categories controlling navigation and route access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Builder,
    Client,
    Accountant,
    Investor,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 5] = [Self::Admin, Self::Builder, Self::Client, Self::Accountant, Self::Investor];

    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Builder => "builder",
            Self::Client => "client",
            Self::Accountant => "accountant",
            Self::Investor => "investor",
        }
    }

    /// Landing path for a freshly authenticated user of this role.
    #[must_use]
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Builder => "/builder",
            Self::Client => "/client",
            Self::Accountant => "/accountant",
            Self::Investor => "/investor",
        }
    }

    /// The capability that gates this role's dashboard routes.
    #[must_use]
    pub fn dashboard(self) -> Capability {
        match self {
            Self::Admin => Capability::AdminDashboard,
            Self::Builder => Capability::BuilderDashboard,
            Self::Client => Capability::ClientDashboard,
            Self::Accountant => Capability::AccountantDashboard,
            Self::Investor => Capability::InvestorDashboard,
        }
    }

    /// Capabilities granted to this role by the access table.
    #[must_use]
    pub fn capabilities(self) -> &'static [Capability] {
        capability::grants(self)
    }

    /// Whether this role holds `cap`.
    #[must_use]
    pub fn can(self, cap: Capability) -> bool {
        self.capabilities().contains(&cap)
    }

    /// Whether this role may enter routes gated on `other`'s dashboard.
    #[must_use]
    pub fn can_act_as(self, other: Role) -> bool {
        self.can(other.dashboard())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "builder" => Ok(Self::Builder),
            "client" => Ok(Self::Client),
            "accountant" => Ok(Self::Accountant),
            "investor" => Ok(Self::Investor),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[path = "role_test.rs"]
mod tests;
