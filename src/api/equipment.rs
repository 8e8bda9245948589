//! Imaging equipment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::EquipmentRepository,
    middleware::AuthUser,
    models::{CreateEquipmentRequest, Equipment, RenameEquipmentRequest, Role},
    services::MembershipService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment).post(create_equipment))
        .route("/{id}", axum::routing::put(rename_equipment).delete(delete_equipment))
}

/// List an organization's equipment, newest first
async fn list_equipment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Equipment>>, AppError> {
    let membership = MembershipService::new(state.db.clone())
        .resolve_by_slug(&slug, auth_user.id)
        .await?;

    let equipment = EquipmentRepository::new(&state.db)
        .list_by_organization(membership.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list equipment: {}", e);
            AppError::internal("Failed to list equipment")
        })?;

    Ok(Json(equipment))
}

/// Register a piece of equipment
async fn create_equipment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CreateEquipmentRequest>,
) -> Result<(StatusCode, Json<Equipment>), AppError> {
    payload.validate()?;

    let membership = MembershipService::new(state.db.clone())
        .require_role(&slug, auth_user.id, &[Role::SuperAdmin])
        .await?;

    let equipment = Equipment::new(
        payload.name.trim().to_string(),
        membership.organization_id,
    );
    EquipmentRepository::new(&state.db)
        .create(&equipment)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create equipment: {}", e);
            AppError::internal("Failed to create equipment")
        })?;

    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Rename a piece of equipment
async fn rename_equipment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((slug, id)): Path<(String, String)>,
    Json(payload): Json<RenameEquipmentRequest>,
) -> Result<Json<Equipment>, AppError> {
    payload.validate()?;

    let membership = MembershipService::new(state.db.clone())
        .require_role(&slug, auth_user.id, &[Role::SuperAdmin])
        .await?;

    let equipment = find_in_org(&state, &id, membership.organization_id).await?;

    let repo = EquipmentRepository::new(&state.db);
    repo.rename(equipment.id, payload.name.trim())
        .await
        .map_err(|e| {
            tracing::error!("Failed to rename equipment: {}", e);
            AppError::internal("Failed to rename equipment")
        })?;

    let renamed = repo
        .find_by_id(equipment.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get equipment: {}", e);
            AppError::internal("Failed to get equipment")
        })?
        .ok_or_else(|| AppError::not_found("Equipment not found"))?;

    Ok(Json(renamed))
}

/// Remove a piece of equipment
async fn delete_equipment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((slug, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let membership = MembershipService::new(state.db.clone())
        .require_role(&slug, auth_user.id, &[Role::SuperAdmin])
        .await?;

    let equipment = find_in_org(&state, &id, membership.organization_id).await?;

    EquipmentRepository::new(&state.db)
        .delete(equipment.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete equipment: {}", e);
            AppError::internal("Failed to delete equipment")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Look up equipment by id, scoped to the resolved organization
async fn find_in_org(
    state: &AppState,
    id: &str,
    organization_id: Uuid,
) -> Result<Equipment, AppError> {
    let equipment_id =
        Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid equipment ID"))?;

    EquipmentRepository::new(&state.db)
        .find_by_id(equipment_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get equipment: {}", e);
            AppError::internal("Failed to get equipment")
        })?
        .filter(|eq| eq.organization_id == organization_id)
        .ok_or_else(|| AppError::not_found("Equipment not found"))
}
