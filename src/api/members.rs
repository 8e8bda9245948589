//! Organization member API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    db::MemberRepository,
    middleware::AuthUser,
    models::{MemberWithUser, Role},
    services::MembershipService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members))
        .route("/{id}", delete(remove_member))
}

/// List the active members of an organization, oldest first
async fn list_members(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<MemberWithUser>>, AppError> {
    let membership = MembershipService::new(state.db.clone())
        .require_role(&slug, auth_user.id, &[Role::SuperAdmin])
        .await?;

    let members = MemberRepository::new(&state.db)
        .list_with_users(membership.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list members: {}", e);
            AppError::internal("Failed to list members")
        })?;

    Ok(Json(members))
}

/// Remove a member from an organization
async fn remove_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((slug, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let member_id =
        Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid member ID"))?;

    MembershipService::new(state.db.clone())
        .remove_member(&slug, auth_user.id, member_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
