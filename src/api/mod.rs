//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod auth;
mod equipment;
mod health;
mod invites;
mod members;
mod organizations;

pub use health::*;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Authentication endpoints (no auth required)
        .nest("/auth", auth::public_routes())
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // Protected auth endpoints (profile)
        .nest("/auth", auth::protected_routes())
        // Tenant-scoped resource endpoints
        .nest("/organizations", organizations::routes())
        .nest("/organizations/{slug}/members", members::routes())
        .nest("/organizations/{slug}/invites", invites::routes())
        .nest("/organizations/{slug}/equipment", equipment::routes())
        // Invitations addressed to the caller, across organizations
        .route("/invites", get(invites::list_my_invites))
}

/// Create the full API router (public + protected; useful for tests)
pub fn routes() -> Router<AppState> {
    public_routes().merge(protected_routes())
}
