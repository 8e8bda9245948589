//! Invitation lifecycle
//!
//! An invitation moves from pending to exactly one of accepted, rejected,
//! or expired. Expiry is derived from `expires_at` rather than stored, and
//! acceptance consumes the row atomically with member creation.

use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::db::{InviteRepository, MemberRepository, OrganizationRepository, UserRepository};
use crate::models::{
    CreateInviteRequest, Invite, Member, Organization, RecipientInvite, Role, User,
};
use crate::services::{Mailer, MembershipService};
use crate::utils::{AppError, AppResult};

pub struct InvitationService {
    pool: SqlitePool,
    mailer: Mailer,
}

impl InvitationService {
    pub fn new(pool: SqlitePool, mailer: Mailer) -> Self {
        Self { pool, mailer }
    }

    fn membership(&self) -> MembershipService {
        MembershipService::new(self.pool.clone())
    }

    /// Create an invitation for an email address
    ///
    /// Super-admin gated. Refused when the email already belongs to an
    /// active member or a live invitation is already pending for it. The
    /// notification email is dispatched in the background; its failure is
    /// logged and never rolls back the invitation.
    pub async fn create(
        &self,
        org_slug: &str,
        caller_id: Uuid,
        req: &CreateInviteRequest,
    ) -> AppResult<Invite> {
        let membership = self
            .membership()
            .require_role(org_slug, caller_id, &[Role::SuperAdmin])
            .await?;

        let email = req.email.trim().to_lowercase();

        if MemberRepository::new(&self.pool)
            .find_active_by_email_and_org(&email, membership.organization_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "A member with this email already belongs to the organization",
            ));
        }

        let invites = InviteRepository::new(&self.pool);
        if invites
            .find_live_by_email_and_org(&email, membership.organization_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "An invitation for this email is already pending",
            ));
        }

        let org = OrganizationRepository::new(&self.pool)
            .get_by_id(membership.organization_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        let invite = Invite::new(email, membership.organization_id, req.role);
        invites.create(&invite).await?;

        let mailer = self.mailer.clone();
        let outbound = invite.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_invite(&outbound, &org.name).await {
                warn!(
                    error = %e,
                    invite_id = %outbound.id,
                    email = %outbound.email,
                    "Failed to send invitation email"
                );
            }
        });

        Ok(invite)
    }

    /// List the live invitations of an organization, soonest expiry first
    pub async fn list_for_organization(
        &self,
        org_slug: &str,
        caller_id: Uuid,
    ) -> AppResult<Vec<Invite>> {
        let membership = self
            .membership()
            .require_role(org_slug, caller_id, &[Role::SuperAdmin])
            .await?;

        let invites = InviteRepository::new(&self.pool)
            .list_live_by_organization(membership.organization_id)
            .await?;

        Ok(invites)
    }

    /// List every invitation addressed to the caller's email
    pub async fn list_for_recipient(&self, user_id: Uuid) -> AppResult<Vec<RecipientInvite>> {
        let user = self.get_caller(user_id).await?;

        let invites = InviteRepository::new(&self.pool)
            .list_by_email(&user.email)
            .await?;

        Ok(invites)
    }

    /// Accept the caller's invitation to an organization
    ///
    /// Member creation and invite deletion commit together. Under
    /// concurrent accepts exactly one caller wins; the loser sees the
    /// invite already gone or trips the membership uniqueness constraint.
    pub async fn accept(&self, org_slug: &str, user_id: Uuid) -> AppResult<Member> {
        let org = self.get_org(org_slug).await?;
        let user = self.get_caller(user_id).await?;

        let invite = InviteRepository::new(&self.pool)
            .find_by_email_and_org(&user.email, org.id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        if invite.is_expired() {
            return Err(AppError::bad_request("Invitation has expired"));
        }

        if MemberRepository::new(&self.pool)
            .find_by_user_and_org(user.id, org.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "You are already a member of this organization",
            ));
        }

        let member = Member::new(user.id, org.id, invite.role);

        let mut tx = self.pool.begin().await?;

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
        .await?;

        let deleted = sqlx::query("DELETE FROM invites WHERE id = ?")
            .bind(invite.id.to_string())
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // The invite was consumed after we read it; dropping the
            // transaction rolls back the member row.
            return Err(AppError::not_found("Invitation not found"));
        }

        tx.commit().await?;

        Ok(member)
    }

    /// Reject the caller's invitation to an organization
    ///
    /// Deletion is not expiry-gated, so an expired invitation can still be
    /// cleared by its recipient.
    pub async fn reject(&self, org_slug: &str, user_id: Uuid) -> AppResult<()> {
        let org = self.get_org(org_slug).await?;
        let user = self.get_caller(user_id).await?;

        let invites = InviteRepository::new(&self.pool);
        let invite = invites
            .find_by_email_and_org(&user.email, org.id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        if !invites.delete(invite.id).await? {
            return Err(AppError::not_found("Invitation not found"));
        }

        Ok(())
    }

    async fn get_org(&self, org_slug: &str) -> AppResult<Organization> {
        OrganizationRepository::new(&self.pool)
            .get_by_slug(org_slug)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    async fn get_caller(&self, user_id: Uuid) -> AppResult<User> {
        UserRepository::new(&self.pool)
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User account not found"))
    }
}
