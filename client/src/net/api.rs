//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Native builds (tests): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Magic-link failures keep the server's distinction between an unknown,
//! expired, and already-used link so the page can say which one happened.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{CurrentUser, InvitationSummary, InviteRequest, MagicLinkResponse, TeamMember};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("link not found")]
    NotFound,
    #[error("link expired")]
    Expired,
    #[error("link already used")]
    AlreadyUsed,
    /// The bearer token was missing, unknown, or never accepted.
    #[error("token not accepted")]
    Unauthorized,
    #[error("request failed ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Text shown on the magic-link landing page.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound => "This sign-in link is not valid. Ask your administrator for a new invitation.",
            Self::Expired => "This sign-in link has expired. Ask your administrator to resend it.",
            Self::AlreadyUsed => "This sign-in link was already used. Sign in again from the original device or ask for a new link.",
            Self::Unauthorized | Self::Rejected { .. } | Self::Network(_) | Self::Unavailable => {
                "Sign-in failed. Please try again."
            }
        }
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn magic_link_endpoint(token: &str) -> String {
    format!("/api/magic/{token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn error_for_status(status: u16, message: Option<String>) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound,
        409 => ApiError::AlreadyUsed,
        410 => ApiError::Expired,
        _ => ApiError::Rejected { status, message: message.unwrap_or_else(|| format!("status {status}")) },
    }
}

#[cfg(feature = "hydrate")]
async fn read_error(resp: gloo_net::http::Response) -> ApiError {
    let status = resp.status();
    let message = resp.json::<super::types::ErrorBody>().await.ok().map(|b| b.error);
    error_for_status(status, message)
}

/// Consume a magic link via `GET /api/magic/{token}`.
///
/// # Errors
///
/// [`ApiError::NotFound`], [`ApiError::Expired`], or
/// [`ApiError::AlreadyUsed`] for the matching server responses.
pub async fn consume_magic_link(token: &str) -> Result<MagicLinkResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&magic_link_endpoint(token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(read_error(resp).await);
        }
        resp.json::<MagicLinkResponse>()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
        Err(ApiError::Unavailable)
    }
}

/// Fetch the invitation-derived identity for a magic token from
/// `/api/auth/user`.
///
/// # Errors
///
/// [`ApiError::Unauthorized`] when the server no longer accepts the token,
/// [`ApiError::Network`] when it could not be asked.
pub async fn fetch_current_user(magic_token: &str) -> Result<CurrentUser, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/user")
            .header("Authorization", &bearer_header(magic_token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(read_error(resp).await);
        }
        resp.json::<super::types::CurrentUserResponse>()
            .await
            .map(|body| body.user)
            .map_err(|e| ApiError::Network(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = magic_token;
        Err(ApiError::Unavailable)
    }
}

/// Every invitation via `GET /api/team/invitations`, oldest first.
///
/// # Errors
///
/// [`ApiError`] when the request fails.
pub async fn list_invitations() -> Result<Vec<TeamMember>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/team/invitations")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(read_error(resp).await);
        }
        resp.json::<super::types::InvitationListResponse>()
            .await
            .map(|body| body.invitations)
            .map_err(|e| ApiError::Network(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Invite a team member via `POST /api/team/invite`.
///
/// # Errors
///
/// [`ApiError::Rejected`] with the server's message for invalid input.
pub async fn send_invite(request: &InviteRequest) -> Result<InvitationSummary, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/team/invite")
            .json(request)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(read_error(resp).await);
        }
        resp.json::<super::types::InviteResponse>()
            .await
            .map(|body| body.invitation)
            .map_err(|e| ApiError::Network(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(ApiError::Unavailable)
    }
}

/// Run the invitation expiry sweep via `POST /api/admin/cleanup-invitations`.
/// Returns the server's summary message.
///
/// # Errors
///
/// [`ApiError`] when the request fails.
pub async fn cleanup_invitations() -> Result<String, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        #[derive(serde::Deserialize)]
        struct CleanupResponse {
            message: String,
        }
        let resp = gloo_net::http::Request::post("/api/admin/cleanup-invitations")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(read_error(resp).await);
        }
        resp.json::<CleanupResponse>()
            .await
            .map(|body| body.message)
            .map_err(|e| ApiError::Network(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}
