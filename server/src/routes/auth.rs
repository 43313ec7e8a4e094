//! Bearer identity: resolves an accepted magic token to its invitation.

use access::Role;
use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::Response;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::error_response;
use crate::services::invitation::InvitationRecord;
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Invitation authenticated by `Authorization: Bearer <magic token>`.
/// Use as a handler parameter to require an accepted invitation.
pub struct BearerUser {
    pub invitation: InvitationRecord,
}

impl<S> FromRequestParts<S> for BearerUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))?;

        let app_state = AppState::from_ref(state);
        let invitation = app_state
            .invitations
            .authenticate(bearer.token())
            .map_err(|e| {
                debug!(error = %e, "bearer token rejected");
                error_response(StatusCode::UNAUTHORIZED, &e.to_string())
            })?;

        Ok(Self { invitation })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub role: Role,
    pub project_id: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

impl From<InvitationRecord> for CurrentUser {
    fn from(record: InvitationRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name().to_owned(),
            email: record.email,
            name: record.name,
            role: record.role,
            project_id: record.project_id,
            last_login: record.last_login,
        }
    }
}

/// `GET /api/auth/user`: return the invitation-derived identity.
pub async fn user(auth: BearerUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "user": CurrentUser::from(auth.invitation) }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
