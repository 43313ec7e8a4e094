//! Invitation ledger: magic-link invitations held in memory.
//!
//! DESIGN
//! ======
//! Records are keyed by their magic token in a `HashMap` behind a
//! `std::sync::Mutex`. Every operation takes the lock, mutates, and releases
//! it without awaiting, so handlers and the expiry sweeper interleave but
//! never observe a half-applied transition. Nothing is persisted: a restart
//! drops every invitation.
//!
//! LIFECYCLE
//! =========
//! `pending -> active` on the first consumption before expiry.
//! `pending | active -> expired` when a consumption, bearer lookup, or sweep
//! observes `now >= token_expiry`. Records leave the ledger only through
//! [`InvitationLedger::revoke`].
//!
//! Tokens are single use: consuming an active record reports
//! [`InvitationError::AlreadyUsed`] and leaves the record untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use access::Role;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::token;

const DEFAULT_CREATED_BY: &str = "system";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvitationError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("name is required")]
    InvalidName,
    #[error("invitation not found")]
    NotFound,
    #[error("invitation has expired")]
    Expired,
    #[error("invitation link has already been used")]
    AlreadyUsed,
    #[error("invitation has not been accepted yet")]
    NotActivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Active,
    Expired,
}

/// One invited team member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub project_id: Option<String>,
    pub created_by: String,
    /// Bearer credential. Never serialized into listings.
    #[serde(skip_serializing)]
    pub magic_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub token_expiry: OffsetDateTime,
    pub status: InvitationStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

impl InvitationRecord {
    /// Expired by status or by clock. Expiry is inclusive of `token_expiry`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.status == InvitationStatus::Expired || now >= self.token_expiry
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Input for [`InvitationLedger::create`].
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub project_id: Option<String>,
    pub created_by: String,
}

/// Result of a successful magic-link consumption.
#[derive(Debug, Clone)]
pub struct MagicLogin {
    pub invitation: InvitationRecord,
    /// Landing path derived from the invited role.
    pub redirect_to: &'static str,
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

// =============================================================================
// LEDGER
// =============================================================================

#[derive(Clone)]
pub struct InvitationLedger {
    records: Arc<Mutex<HashMap<String, InvitationRecord>>>,
    ttl: time::Duration,
}

impl InvitationLedger {
    #[must_use]
    pub fn new(ttl: time::Duration) -> Self {
        Self { records: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> time::Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, InvitationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Record a new pending invitation with a fresh token.
    ///
    /// # Errors
    ///
    /// [`InvitationError::InvalidEmail`] or [`InvitationError::InvalidName`]
    /// when the input does not describe a person we can invite.
    pub fn create(&self, new: NewInvitation) -> Result<InvitationRecord, InvitationError> {
        self.create_at(new, OffsetDateTime::now_utc())
    }

    pub(crate) fn create_at(&self, new: NewInvitation, now: OffsetDateTime) -> Result<InvitationRecord, InvitationError> {
        let email = normalize_email(&new.email).ok_or(InvitationError::InvalidEmail)?;
        let name = new.name.trim().to_owned();
        if name.is_empty() {
            return Err(InvitationError::InvalidName);
        }
        let project_id = new
            .project_id
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        let created_by = Some(new.created_by.trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CREATED_BY)
            .to_owned();

        let mut records = self.lock();
        let record = InvitationRecord {
            id: Uuid::new_v4(),
            name,
            email,
            role: new.role,
            project_id,
            created_by,
            magic_token: fresh_token(&records),
            created_at: now,
            token_expiry: now + self.ttl,
            status: InvitationStatus::Pending,
            last_login: None,
        };
        records.insert(record.magic_token.clone(), record.clone());
        Ok(record)
    }

    /// Exchange a magic token for the invited identity.
    ///
    /// # Errors
    ///
    /// [`InvitationError::NotFound`] for an unknown token,
    /// [`InvitationError::Expired`] once the token's window has passed (the
    /// record is marked expired as a side effect), and
    /// [`InvitationError::AlreadyUsed`] for a token that was already consumed.
    pub fn consume(&self, token: &str) -> Result<MagicLogin, InvitationError> {
        self.consume_at(token, OffsetDateTime::now_utc())
    }

    pub(crate) fn consume_at(&self, token: &str, now: OffsetDateTime) -> Result<MagicLogin, InvitationError> {
        if !token::is_well_formed(token) {
            return Err(InvitationError::NotFound);
        }
        let mut records = self.lock();
        let record = records.get_mut(token).ok_or(InvitationError::NotFound)?;
        if record.is_expired_at(now) {
            record.status = InvitationStatus::Expired;
            return Err(InvitationError::Expired);
        }
        match record.status {
            InvitationStatus::Pending => {
                record.status = InvitationStatus::Active;
                record.last_login = Some(now);
                Ok(MagicLogin { invitation: record.clone(), redirect_to: record.role.home_path() })
            }
            InvitationStatus::Active => Err(InvitationError::AlreadyUsed),
            InvitationStatus::Expired => Err(InvitationError::Expired),
        }
    }

    /// Resolve a bearer token to an accepted, unexpired invitation.
    ///
    /// # Errors
    ///
    /// [`InvitationError::NotFound`], [`InvitationError::Expired`], or
    /// [`InvitationError::NotActivated`] for a link nobody has opened yet.
    pub fn authenticate(&self, token: &str) -> Result<InvitationRecord, InvitationError> {
        self.authenticate_at(token, OffsetDateTime::now_utc())
    }

    pub(crate) fn authenticate_at(&self, token: &str, now: OffsetDateTime) -> Result<InvitationRecord, InvitationError> {
        if !token::is_well_formed(token) {
            return Err(InvitationError::NotFound);
        }
        let mut records = self.lock();
        let record = records.get_mut(token).ok_or(InvitationError::NotFound)?;
        if record.is_expired_at(now) {
            record.status = InvitationStatus::Expired;
            return Err(InvitationError::Expired);
        }
        match record.status {
            InvitationStatus::Active => Ok(record.clone()),
            InvitationStatus::Pending => Err(InvitationError::NotActivated),
            InvitationStatus::Expired => Err(InvitationError::Expired),
        }
    }

    /// Mark every record past its expiry as expired. Returns how many changed.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(OffsetDateTime::now_utc())
    }

    pub(crate) fn cleanup_expired_at(&self, now: OffsetDateTime) -> usize {
        let mut records = self.lock();
        let mut swept = 0;
        for record in records.values_mut() {
            if record.status != InvitationStatus::Expired && now >= record.token_expiry {
                record.status = InvitationStatus::Expired;
                swept += 1;
            }
        }
        swept
    }

    /// All records, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<InvitationRecord> {
        let mut all: Vec<InvitationRecord> = self.lock().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<InvitationRecord> {
        self.lock().values().find(|r| r.id == id).cloned()
    }

    /// Replace the token of an unaccepted invitation and restart its window.
    /// The previous token stops working immediately.
    ///
    /// # Errors
    ///
    /// [`InvitationError::NotFound`] for an unknown id and
    /// [`InvitationError::AlreadyUsed`] when the invitee already logged in.
    pub fn resend(&self, id: Uuid) -> Result<InvitationRecord, InvitationError> {
        self.resend_at(id, OffsetDateTime::now_utc())
    }

    pub(crate) fn resend_at(&self, id: Uuid, now: OffsetDateTime) -> Result<InvitationRecord, InvitationError> {
        let mut records = self.lock();
        let old_token = token_for_id(&records, id).ok_or(InvitationError::NotFound)?;
        if records
            .get(&old_token)
            .is_some_and(|r| r.status == InvitationStatus::Active && !r.is_expired_at(now))
        {
            return Err(InvitationError::AlreadyUsed);
        }
        let mut record = records.remove(&old_token).ok_or(InvitationError::NotFound)?;
        record.magic_token = fresh_token(&records);
        record.token_expiry = now + self.ttl;
        record.status = InvitationStatus::Pending;
        records.insert(record.magic_token.clone(), record.clone());
        Ok(record)
    }

    /// Delete one invitation outright.
    ///
    /// # Errors
    ///
    /// [`InvitationError::NotFound`] for an unknown id.
    pub fn revoke(&self, id: Uuid) -> Result<InvitationRecord, InvitationError> {
        let mut records = self.lock();
        let token = token_for_id(&records, id).ok_or(InvitationError::NotFound)?;
        records.remove(&token).ok_or(InvitationError::NotFound)
    }
}

fn token_for_id(records: &HashMap<String, InvitationRecord>, id: Uuid) -> Option<String> {
    records
        .iter()
        .find(|(_, r)| r.id == id)
        .map(|(token, _)| token.clone())
}

fn fresh_token(records: &HashMap<String, InvitationRecord>) -> String {
    loop {
        let candidate = token::generate_token();
        if !records.contains_key(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
#[path = "invitation_test.rs"]
mod tests;
