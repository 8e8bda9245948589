//! Data models

mod equipment;
mod invite;
mod member;
mod organization;
mod user;

pub use equipment::*;
pub use invite::*;
pub use member::*;
pub use organization::*;
pub use user::*;
