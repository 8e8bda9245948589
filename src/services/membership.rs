//! Membership resolution and role gating
//!
//! Every organization-scoped request resolves the caller's membership here
//! before touching tenant data. Resolution always goes to the database, so
//! a role change or removal takes effect on the next request.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{MemberRepository, OrganizationRepository};
use crate::models::{Membership, Role};
use crate::utils::{AppError, AppResult};

/// Returned for a missing organization, a missing membership, and an
/// inactive membership alike, so callers cannot probe which organizations
/// exist.
const NOT_A_MEMBER: &str = "You are not a member of this organization";

pub struct MembershipService {
    pool: SqlitePool,
}

impl MembershipService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve the caller's active membership in the organization behind a slug
    pub async fn resolve_by_slug(&self, org_slug: &str, user_id: Uuid) -> AppResult<Membership> {
        let org = OrganizationRepository::new(&self.pool)
            .get_by_slug(org_slug)
            .await?
            .ok_or_else(|| AppError::unauthorized(NOT_A_MEMBER))?;

        let member = MemberRepository::new(&self.pool)
            .find_by_user_and_org(user_id, org.id)
            .await?
            .filter(|m| m.active)
            .ok_or_else(|| AppError::unauthorized(NOT_A_MEMBER))?;

        Ok(Membership {
            organization_id: org.id,
            role: member.role,
        })
    }

    /// Resolve the caller's membership and require one of the allowed roles
    pub async fn require_role(
        &self,
        org_slug: &str,
        user_id: Uuid,
        allowed: &[Role],
    ) -> AppResult<Membership> {
        let membership = self.resolve_by_slug(org_slug, user_id).await?;

        if !allowed.contains(&membership.role) {
            return Err(AppError::forbidden(
                "You do not have permission to perform this action",
            ));
        }

        Ok(membership)
    }

    /// Remove a member from an organization
    ///
    /// Super-admin gated. Refuses to remove the last active super admin,
    /// and refuses self-removal so an administrator cannot strand an
    /// organization by accident.
    pub async fn remove_member(
        &self,
        org_slug: &str,
        caller_id: Uuid,
        member_id: Uuid,
    ) -> AppResult<()> {
        let membership = self
            .require_role(org_slug, caller_id, &[Role::SuperAdmin])
            .await?;

        let repo = MemberRepository::new(&self.pool);

        let member = repo
            .find_by_id(member_id)
            .await?
            .filter(|m| m.organization_id == membership.organization_id && m.active)
            .ok_or_else(|| AppError::not_found("Member not found"))?;

        if member.role == Role::SuperAdmin {
            let others = repo
                .count_other_active_super_admins(membership.organization_id, member.id)
                .await?;
            if others == 0 {
                return Err(AppError::conflict(
                    "Cannot remove the last super admin of an organization",
                ));
            }
        }

        if member.user_id == caller_id {
            return Err(AppError::conflict(
                "You cannot remove yourself from an organization",
            ));
        }

        repo.delete(member.id).await?;

        Ok(())
    }
}
