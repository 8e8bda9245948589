//! Organization (tenant) API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::{
    db::OrganizationRepository,
    middleware::AuthUser,
    models::{
        CreateOrganizationRequest, Membership, Organization, RenameOrganizationRequest, Role,
    },
    services::MembershipService,
    utils::validation::{slugify, validate_slug},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route(
            "/{slug}",
            get(get_organization)
                .put(rename_organization)
                .delete(delete_organization),
        )
        .route("/{slug}/membership", get(get_my_membership))
}

/// List the organizations the caller belongs to
async fn list_organizations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Organization>>, AppError> {
    let repo = OrganizationRepository::new(&state.db);
    let orgs = repo.list_for_user(auth_user.id).await.map_err(|e| {
        tracing::error!("Failed to list organizations: {}", e);
        AppError::internal("Failed to list organizations")
    })?;

    Ok(Json(orgs))
}

/// Create an organization; the caller becomes its first super admin
async fn create_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let slug = slugify(&name);
    if !validate_slug(&slug) {
        return Err(AppError::bad_request(
            "Organization name must contain letters or digits",
        ));
    }

    let org = Organization::new(name, slug);
    let repo = OrganizationRepository::new(&state.db);
    repo.create_with_owner(&org, auth_user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create organization: {}", e);
            if e.to_string().contains("UNIQUE constraint failed") {
                AppError::conflict("An organization with this name already exists")
            } else {
                AppError::internal("Failed to create organization")
            }
        })?;

    Ok((StatusCode::CREATED, Json(org)))
}

/// Organization detail, visible to its members only
async fn get_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Organization>, AppError> {
    let membership = MembershipService::new(state.db.clone())
        .resolve_by_slug(&slug, auth_user.id)
        .await?;

    let org = OrganizationRepository::new(&state.db)
        .get_by_id(membership.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get organization: {}", e);
            AppError::internal("Failed to get organization")
        })?
        .ok_or_else(|| AppError::not_found("Organization not found"))?;

    Ok(Json(org))
}

/// Rename an organization; the slug never changes
async fn rename_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<RenameOrganizationRequest>,
) -> Result<Json<Organization>, AppError> {
    payload.validate()?;

    let membership = MembershipService::new(state.db.clone())
        .require_role(&slug, auth_user.id, &[Role::SuperAdmin])
        .await?;

    let updated = OrganizationRepository::new(&state.db)
        .rename(membership.organization_id, payload.name.trim())
        .await
        .map_err(|e| {
            tracing::error!("Failed to rename organization: {}", e);
            AppError::internal("Failed to rename organization")
        })?
        .ok_or_else(|| AppError::not_found("Organization not found"))?;

    Ok(Json(updated))
}

/// Delete an organization; members, invites, and equipment cascade
async fn delete_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<bool>, AppError> {
    let membership = MembershipService::new(state.db.clone())
        .require_role(&slug, auth_user.id, &[Role::SuperAdmin])
        .await?;

    let deleted = OrganizationRepository::new(&state.db)
        .delete(membership.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete organization: {}", e);
            AppError::internal("Failed to delete organization")
        })?;

    Ok(Json(deleted))
}

/// The caller's own membership in this organization
async fn get_my_membership(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Membership>, AppError> {
    let membership = MembershipService::new(state.db.clone())
        .resolve_by_slug(&slug, auth_user.id)
        .await?;

    Ok(Json(membership))
}
