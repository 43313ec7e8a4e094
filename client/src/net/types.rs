//! Wire DTOs for the invitation and magic-link endpoints.
//!
//! DESIGN
//! ======
//! These mirror the server's camelCase JSON bodies. Roles decode straight
//! into [`Role`], so a response naming an unknown role fails to parse rather
//! than producing a session the guards would have to second-guess.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use access::Role;
use serde::{Deserialize, Serialize};

use crate::session::{Actor, UserSession};

/// Identity returned by `GET /api/magic/{token}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicUser {
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub role: Role,
    #[serde(default)]
    pub project_id: Option<String>,
    pub magic_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkResponse {
    pub success: bool,
    pub user: MagicUser,
    pub redirect_to: String,
}

impl MagicLinkResponse {
    /// Session to persist after a successful magic-link login.
    #[must_use]
    pub fn into_session(self, login_time: i64) -> UserSession {
        let user = self.user;
        let mut session = UserSession::new(user.email, user.name, user.role, login_time);
        session.project_id = user.project_id;
        session.magic_token = Some(user.magic_token);
        session
    }
}

/// Body of `POST /api/team/invite`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub magic_link: String,
    pub expires_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteResponse {
    pub success: bool,
    pub invitation: InvitationSummary,
}

/// One row of `GET /api/team/invitations`. The server never lists tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub project_id: Option<String>,
    pub status: String,
    pub token_expiry: String,
    #[serde(default)]
    pub last_login: Option<String>,
}

impl TeamMember {
    /// The member as an impersonation target.
    #[must_use]
    pub fn as_actor(&self) -> Actor {
        Actor { email: self.email.clone(), name: self.name.clone(), role: self.role }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationListResponse {
    pub success: bool,
    pub invitations: Vec<TeamMember>,
}

/// Identity returned by `GET /api/auth/user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub role: Role,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: CurrentUser,
}

/// `{success: false, error}` body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}
