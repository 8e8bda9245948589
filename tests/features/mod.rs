//! Cucumber scenario support

pub mod step_definitions;
pub mod support;

pub use support::TestWorld;
