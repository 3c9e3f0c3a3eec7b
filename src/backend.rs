//! Probe-volume backend abstraction
//!
//! The bake systems in this crate never talk to a renderer directly. They go
//! through [`ProbeVolumeBackend`], a trait describing the small slice of a
//! global-illumination probe subsystem they depend on: an initialization flag,
//! a current baking set, a current lighting scenario, and bake entry points.
//! Hosts install their implementation as a [`ProbeVolumeHandle`] resource;
//! tests install a scripted one.

use bevy::prelude::*;
use std::any::Any;

/// The collection of lighting scenarios a probe volume bakes into.
///
/// Backends that have finished loading may still report no baking set; the
/// bake trigger treats that as a hard precondition failure.
pub trait BakingSet: Send + Sync {
    /// Registers a scenario name. Returns `true` if the scenario was newly
    /// added, `false` if it already existed. Adding an existing name must be
    /// a no-op.
    fn try_add_scenario(&mut self, name: &str) -> bool;

    /// Whether a scenario with this exact name is registered.
    fn contains_scenario(&self, name: &str) -> bool;
}

/// Host-side probe-volume subsystem as seen by this crate.
pub trait ProbeVolumeBackend: Send + Sync {
    /// Whether the subsystem has finished its own internal setup. May flip
    /// from `false` to `true` at any point after startup.
    fn is_initialized(&self) -> bool;

    /// The active baking set, if one has been assigned.
    fn baking_set(&self) -> Option<&dyn BakingSet>;

    fn baking_set_mut(&mut self) -> Option<&mut dyn BakingSet>;

    /// Name of the lighting scenario bakes currently write into.
    fn lighting_scenario(&self) -> &str;

    fn set_lighting_scenario(&mut self, name: &str);

    /// Whether a bake is currently running.
    fn is_baking(&self) -> bool;

    /// Runs a bake to completion. Returns `false` if the backend refused or
    /// aborted the bake.
    fn bake(&mut self) -> bool;

    /// Starts a bake and returns once it is underway. Completion is not
    /// observable through this trait.
    fn bake_async(&mut self) -> bool;

    /// Get self as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The installed probe-volume backend.
///
/// Inserting this resource is what binds the readiness latch and the bake
/// systems to a host. Without it the latch never advances and bake commands
/// are dropped with a warning.
#[derive(Resource, Deref, DerefMut)]
pub struct ProbeVolumeHandle(pub Box<dyn ProbeVolumeBackend>);

impl ProbeVolumeHandle {
    pub fn new(backend: impl ProbeVolumeBackend + 'static) -> Self {
        Self(Box::new(backend))
    }
}
