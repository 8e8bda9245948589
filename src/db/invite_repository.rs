//! Invitation repository
//!
//! Liveness is derived from `expires_at` at query time; expired rows may
//! linger until consumed or garbage-collected, so the lookups here are split
//! between "live only" and "any" variants.

use anyhow::{Context, Result};
use std::str::FromStr;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{Invite, InviteOrgInfo, RecipientInvite, Role};

#[derive(Debug, sqlx::FromRow)]
struct InviteRow {
    id: String,
    email: String,
    organization_id: String,
    role: String,
    expires_at: String,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct RecipientInviteRow {
    id: String,
    email: String,
    role: String,
    expires_at: String,
    created_at: String,
    org_id: String,
    org_name: String,
    org_slug: String,
}

pub struct InviteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InviteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the most recent invite for (email, organization), live or not
    ///
    /// Accept and reject both start here: the caller distinguishes "no row"
    /// from "row past its expiry".
    pub async fn find_by_email_and_org(
        &self,
        email: &str,
        organization_id: Uuid,
    ) -> Result<Option<Invite>> {
        let row = sqlx::query_as::<_, InviteRow>(
            r#"
            SELECT id, email, organization_id, role, expires_at, created_at
            FROM invites
            WHERE email = ? AND organization_id = ?
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .bind(organization_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get invite by email and organization")?;

        Ok(row.map(row_to_invite))
    }

    /// Find a live invite for (email, organization)
    pub async fn find_live_by_email_and_org(
        &self,
        email: &str,
        organization_id: Uuid,
    ) -> Result<Option<Invite>> {
        let row = sqlx::query_as::<_, InviteRow>(
            r#"
            SELECT id, email, organization_id, role, expires_at, created_at
            FROM invites
            WHERE email = ? AND organization_id = ? AND expires_at > ?
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .bind(organization_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get live invite")?;

        Ok(row.map(row_to_invite))
    }

    /// List the live invites of an organization, soonest-expiring first
    pub async fn list_live_by_organization(&self, organization_id: Uuid) -> Result<Vec<Invite>> {
        let rows = sqlx::query_as::<_, InviteRow>(
            r#"
            SELECT id, email, organization_id, role, expires_at, created_at
            FROM invites
            WHERE organization_id = ? AND expires_at > ?
            ORDER BY expires_at ASC
            "#,
        )
        .bind(organization_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .fetch_all(self.pool)
        .await
        .context("Failed to list invites")?;

        Ok(rows.into_iter().map(row_to_invite).collect())
    }

    /// List every invite addressed to an email across all organizations,
    /// freshest expiry first
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<RecipientInvite>> {
        let rows = sqlx::query_as::<_, RecipientInviteRow>(
            r#"
            SELECT i.id, i.email, i.role, i.expires_at, i.created_at,
                   o.id AS org_id, o.name AS org_name, o.slug AS org_slug
            FROM invites i
            INNER JOIN organizations o ON o.id = i.organization_id
            WHERE i.email = ?
            ORDER BY i.expires_at DESC
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_all(self.pool)
        .await
        .context("Failed to list invites for email")?;

        Ok(rows.into_iter().map(row_to_recipient_invite).collect())
    }

    pub async fn create(&self, invite: &Invite) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invites (id, email, organization_id, role, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invite.id.to_string())
        .bind(&invite.email)
        .bind(invite.organization_id.to_string())
        .bind(invite.role.as_str())
        .bind(invite.expires_at.to_rfc3339())
        .bind(invite.created_at.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to create invite")?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invites WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete invite")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_invite(row: InviteRow) -> Invite {
    Invite {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        email: row.email,
        organization_id: Uuid::parse_str(&row.organization_id).unwrap_or_else(|_| Uuid::nil()),
        role: Role::from_str(&row.role).unwrap_or_default(),
        expires_at: parse_db_timestamp(&row.expires_at),
        created_at: parse_db_timestamp(&row.created_at),
    }
}

fn row_to_recipient_invite(row: RecipientInviteRow) -> RecipientInvite {
    RecipientInvite {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        email: row.email,
        role: Role::from_str(&row.role).unwrap_or_default(),
        expires_at: parse_db_timestamp(&row.expires_at),
        created_at: parse_db_timestamp(&row.created_at),
        organization: InviteOrgInfo {
            id: Uuid::parse_str(&row.org_id).unwrap_or_else(|_| Uuid::nil()),
            name: row.org_name,
            slug: row.org_slug,
        },
    }
}
