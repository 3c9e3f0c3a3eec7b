//! Probe baker library
//!
//! This provides probe-volume readiness tracking, lighting-scenario bake
//! orchestration, and probe-GI mesh conversion as a set of Bevy plugins.

pub mod backend;
pub mod components;
pub mod config;
pub mod events;
pub mod plugins;
pub mod prelude;

// Test utilities are public for integration tests
pub mod test_utils;
