//! Invitation API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::{
    middleware::AuthUser,
    models::{CreateInviteRequest, Invite, Member, RecipientInvite},
    services::InvitationService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invites).post(create_invite))
        .route("/accept", post(accept_invite))
        .route("/reject", post(reject_invite))
}

fn service(state: &AppState) -> InvitationService {
    InvitationService::new(state.db.clone(), state.mailer.clone())
}

/// Create an invitation
///
/// POST /api/v1/organizations/{slug}/invites
async fn create_invite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<Invite>), AppError> {
    payload.validate()?;

    let invite = service(&state)
        .create(&slug, auth_user.id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(invite)))
}

/// List an organization's live invitations, soonest expiry first
///
/// GET /api/v1/organizations/{slug}/invites
async fn list_invites(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Invite>>, AppError> {
    let invites = service(&state)
        .list_for_organization(&slug, auth_user.id)
        .await?;

    Ok(Json(invites))
}

/// Accept the caller's invitation to this organization
///
/// POST /api/v1/organizations/{slug}/invites/accept
async fn accept_invite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let member = service(&state).accept(&slug, auth_user.id).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Reject the caller's invitation to this organization
///
/// POST /api/v1/organizations/{slug}/invites/reject
async fn reject_invite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    service(&state).reject(&slug, auth_user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List every invitation addressed to the caller
///
/// GET /api/v1/invites
pub async fn list_my_invites(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<RecipientInvite>>, AppError> {
    let invites = service(&state).list_for_recipient(auth_user.id).await?;

    Ok(Json(invites))
}
