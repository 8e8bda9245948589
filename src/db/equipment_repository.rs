//! Equipment repository

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::Equipment;

#[derive(Debug, sqlx::FromRow)]
struct EquipmentRow {
    id: String,
    name: String,
    organization_id: String,
    created_at: String,
}

pub struct EquipmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EquipmentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT id, name, organization_id, created_at
            FROM equipment
            WHERE organization_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list equipment")?;

        Ok(rows.into_iter().map(row_to_equipment).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>> {
        let row = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT id, name, organization_id, created_at
            FROM equipment
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get equipment")?;

        Ok(row.map(row_to_equipment))
    }

    pub async fn create(&self, equipment: &Equipment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO equipment (id, name, organization_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(equipment.id.to_string())
        .bind(&equipment.name)
        .bind(equipment.organization_id.to_string())
        .bind(equipment.created_at.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to create equipment")?;

        Ok(())
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE equipment SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to rename equipment")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete equipment")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_equipment(row: EquipmentRow) -> Equipment {
    Equipment {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        name: row.name,
        organization_id: Uuid::parse_str(&row.organization_id).unwrap_or_else(|_| Uuid::nil()),
        created_at: parse_db_timestamp(&row.created_at),
    }
}
