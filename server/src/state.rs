//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the invitation ledger, the loaded configuration, and the
//! optional invitation mailer.

use std::sync::Arc;

use crate::config::Config;
use crate::services::invitation::InvitationLedger;
use crate::services::mailer::InvitationMailer;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub invitations: InvitationLedger,
    pub config: Arc<Config>,
    /// Optional mailer. `None` if Resend is not configured.
    pub mailer: Option<Arc<dyn InvitationMailer>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, mailer: Option<Arc<dyn InvitationMailer>>) -> Self {
        Self { invitations: InvitationLedger::new(config.invitation_ttl), config: Arc::new(config), mailer }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
