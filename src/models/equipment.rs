//! Imaging equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Imaging device registered to an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    pub fn new(name: String, organization_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            organization_id,
            created_at: Utc::now(),
        }
    }
}

/// Request to register equipment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEquipmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// Request to rename equipment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameEquipmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}
