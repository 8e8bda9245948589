//! Business logic services

pub mod auth;
pub mod invitations;
pub mod mailer;
pub mod membership;

pub use auth::AuthService;
pub use invitations::InvitationService;
pub use mailer::Mailer;
pub use membership::MembershipService;
