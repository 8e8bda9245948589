//! Membership repository

use anyhow::{Context, Result};
use std::str::FromStr;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{Member, MemberUserInfo, MemberWithUser, Role};

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: String,
    user_id: String,
    organization_id: String,
    role: String,
    active: i64,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct MemberWithUserRow {
    id: String,
    role: String,
    active: i64,
    created_at: String,
    user_id: String,
    user_name: String,
    user_email: String,
}

pub struct MemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemberRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, user_id, organization_id, role, active, created_at
            FROM members
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get member")?;

        Ok(row.map(row_to_member))
    }

    pub async fn find_by_user_and_org(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, user_id, organization_id, role, active, created_at
            FROM members
            WHERE user_id = ? AND organization_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(organization_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get member by user and organization")?;

        Ok(row.map(row_to_member))
    }

    /// Find an active member of an organization by the email of its user
    pub async fn find_active_by_email_and_org(
        &self,
        email: &str,
        organization_id: Uuid,
    ) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id, m.user_id, m.organization_id, m.role, m.active, m.created_at
            FROM members m
            INNER JOIN users u ON u.id = m.user_id
            WHERE u.email = ? AND m.organization_id = ? AND m.active = 1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .bind(organization_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get member by email and organization")?;

        Ok(row.map(row_to_member))
    }

    /// List the active members of an organization with their user details,
    /// oldest membership first
    pub async fn list_with_users(&self, organization_id: Uuid) -> Result<Vec<MemberWithUser>> {
        let rows = sqlx::query_as::<_, MemberWithUserRow>(
            r#"
            SELECT m.id, m.role, m.active, m.created_at,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email
            FROM members m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.organization_id = ? AND m.active = 1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list members")?;

        Ok(rows.into_iter().map(row_to_member_with_user).collect())
    }

    /// Count the active `SUPER_ADMIN` members of an organization other than
    /// the given one
    pub async fn count_other_active_super_admins(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM members
            WHERE organization_id = ? AND role = 'SUPER_ADMIN' AND active = 1 AND id != ?
            "#,
        )
        .bind(organization_id.to_string())
        .bind(member_id.to_string())
        .fetch_one(self.pool)
        .await
        .context("Failed to count super admins")?;

        Ok(count)
    }

    pub async fn create(&self, member: &Member) -> Result<()> {
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
        .execute(self.pool)
        .await
        .context("Failed to create member")?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete member")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_member(row: MemberRow) -> Member {
    Member {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        user_id: Uuid::parse_str(&row.user_id).unwrap_or_else(|_| Uuid::nil()),
        organization_id: Uuid::parse_str(&row.organization_id).unwrap_or_else(|_| Uuid::nil()),
        role: Role::from_str(&row.role).unwrap_or_default(),
        active: row.active != 0,
        created_at: parse_db_timestamp(&row.created_at),
    }
}

fn row_to_member_with_user(row: MemberWithUserRow) -> MemberWithUser {
    MemberWithUser {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        role: Role::from_str(&row.role).unwrap_or_default(),
        active: row.active != 0,
        created_at: parse_db_timestamp(&row.created_at),
        user: MemberUserInfo {
            id: Uuid::parse_str(&row.user_id).unwrap_or_else(|_| Uuid::nil()),
            name: row.user_name,
            email: row.user_email,
        },
    }
}
