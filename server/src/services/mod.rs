//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the invitation lifecycle and its side channels
//! (email, background expiry) so route handlers can stay focused on
//! request parsing and status-code mapping.

pub mod invitation;
pub mod mailer;
pub mod sweeper;
pub mod token;
