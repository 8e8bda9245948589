//! Authentication API endpoints
//!
//! Provides login and profile endpoints. Responses carry
//! `Cache-Control: no-store` so tokens and account details never land in
//! shared caches.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    routing::{get, post},
    Json, Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use validator::Validate;

use crate::{
    middleware::auth::{create_access_token, AuthUser},
    models::{AuthResponse, LoginRequest, UserPublic},
    services::AuthService,
    utils::AppError,
    AppState,
};

fn no_store_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
}

/// Create public routes for authentication endpoints (no auth required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .layer(no_store_layer())
}

/// Create protected routes for authentication endpoints (auth required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .layer(no_store_layer())
}

/// Login handler
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let auth_service = AuthService::new(state.db.clone());

    // One shared message for unknown email and wrong password
    let user = auth_service
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            tracing::error!("Authentication failed: {}", e);
            AppError::internal("Authentication failed")
        })?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let token = create_access_token(
        &user.id,
        &user.email,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to create access token: {}", e);
        AppError::internal("Failed to create access token")
    })?;

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.token_expiry_hours * 3600,
        user: user.into(),
    }))
}

/// Get current authenticated user profile
///
/// GET /api/v1/auth/profile
async fn profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserPublic>, AppError> {
    let user = AuthService::new(state.db.clone())
        .get_user_by_id(auth_user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::internal("Failed to fetch user")
        })?
        .ok_or_else(|| AppError::unauthorized("User account not found"))?;

    Ok(Json(user.into()))
}
