//! Invitation model
//!
//! An invite is a time-bounded, single-use offer converting an email into a
//! member upon acceptance. Expiry is derived from `expires_at`; consuming an
//! invite (accept or reject) deletes the row.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::member::Role;

/// How long a fresh invitation stays acceptable
pub const INVITE_EXPIRY_DAYS: i64 = 7;

/// Invitation entity
///
/// The row id doubles as the opaque acceptance reference included in the
/// notification email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    pub id: Uuid,
    pub email: String,
    pub organization_id: Uuid,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Create a new invitation expiring `INVITE_EXPIRY_DAYS` from now
    pub fn new(email: String, organization_id: Uuid, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            organization_id,
            role,
            expires_at: now + Duration::days(INVITE_EXPIRY_DAYS),
            created_at: now,
        }
    }

    /// Whether this invitation can no longer be accepted
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Request to invite an email into an organization
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInviteRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Organization details embedded in recipient-facing invite listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteOrgInfo {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Invite entry with its organization, as listed for a recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientInvite {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub organization: InviteOrgInfo,
}
