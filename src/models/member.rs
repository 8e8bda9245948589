//! Membership model
//!
//! A member is the durable link between a user and an organization,
//! carrying the role that organization-scoped authorization checks against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission tier within an organization
///
/// `SuperAdmin` is the only tier allowed to manage the organization itself
/// and the one protected by the last-admin invariant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "MEMBER" => Ok(Role::Member),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Create a new active member
    pub fn new(user_id: Uuid, organization_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            organization_id,
            role,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Resolved membership of a caller within one organization
///
/// This is the value every organization-scoped request is built on.
#[derive(Debug, Clone, Serialize)]
pub struct Membership {
    pub organization_id: Uuid,
    pub role: Role,
}

/// User details embedded in member listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Member entry with its user, as returned by member listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberWithUser {
    pub id: Uuid,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub user: MemberUserInfo,
}
