//! Probe baker prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! of this crate to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Backend contract
pub use crate::backend::{BakingSet, ProbeVolumeBackend, ProbeVolumeHandle};

// Internal re-exports - Config
pub use crate::config::BakerConfig;

// Internal re-exports - Components
pub use crate::components::{LightProbeUsage, ReceiveGi};

// Internal re-exports - Events
pub use crate::events::{LightingCommand, ProbeVolumesReady};

// Internal re-exports - Plugins
pub use crate::plugins::ProbeBakeSet;
pub use crate::plugins::baking::{
    BakeMode, ProbeBakePlugin, apply_lighting_scenario, bake_in_progress, bake_lighting_scenario,
    convert_meshes_to_probe_gi,
};
pub use crate::plugins::readiness::{
    ProbeVolumeReadiness, ProbeVolumeReadinessPlugin, ReadinessExt, probe_volumes_ready,
};
