//! Organization (tenant) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to create an organization
///
/// The slug is derived from the name on the server, never client-provided.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}

/// Request to rename an organization (the slug stays stable)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameOrganizationRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}
