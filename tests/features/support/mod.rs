//! Shared world and helpers for Cucumber scenarios


pub use world::TestWorld;
