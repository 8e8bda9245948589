//! Imaging Central Library
//!
//! This crate provides the core functionality for the Imaging Central service:
//! multi-tenant organization management, memberships, invitations, and the
//! equipment registry scoped to each organization.

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use middleware::{auth_middleware, AuthUser, Claims};
use services::Mailer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
    /// Outbound mail delivery for invitations
    pub mailer: Mailer,
}
