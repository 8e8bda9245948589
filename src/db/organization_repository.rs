//! Organization (tenant) repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{Member, Organization, Role};

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: String,
    name: String,
    slug: String,
    created_at: String,
    updated_at: String,
}

pub struct OrganizationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrganizationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get organization")?;

        Ok(row.map(row_to_org))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM organizations
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get organization by slug")?;

        Ok(row.map(row_to_org))
    }

    /// List the organizations a user is an active member of
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT o.id, o.name, o.slug, o.created_at, o.updated_at
            FROM organizations o
            INNER JOIN members m ON m.organization_id = o.id
            WHERE m.user_id = ? AND m.active = 1
            ORDER BY o.name
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list organizations for user")?;

        Ok(rows.into_iter().map(row_to_org).collect())
    }

    /// Create an organization and enroll its creator as `SUPER_ADMIN`
    ///
    /// Both rows land in one transaction so an organization can never exist
    /// without an administrator.
    pub async fn create_with_owner(&self, org: &Organization, owner_id: Uuid) -> Result<Member> {
        let member = Member::new(owner_id, org.id, Role::SuperAdmin);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, slug, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(org.id.to_string())
        .bind(&org.name)
        .bind(&org.slug)
        .bind(org.created_at.to_rfc3339())
        .bind(org.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .context("Failed to create organization")?;

        sqlx::query(
            r#"
            INSERT INTO members (id, user_id, organization_id, role, active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(member.id.to_string())
        .bind(member.user_id.to_string())
        .bind(member.organization_id.to_string())
        .bind(member.role.as_str())
        .bind(member.active as i64)
        .bind(member.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .context("Failed to enroll organization owner")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(member)
    }

    /// Rename an organization, leaving its slug untouched
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Option<Organization>> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to rename organization")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete an organization; members and invites go with it via cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete organization")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_org(row: OrganizationRow) -> Organization {
    Organization {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        name: row.name,
        slug: row.slug,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
