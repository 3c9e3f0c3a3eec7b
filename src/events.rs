//! Centralized event definitions
//!
//! All events this crate emits or consumes are defined here to keep the
//! boundaries between systems visible in one place. Events are organized by
//! category:
//! - Lighting command pattern (the host-facing trigger surface)
//! - Readiness notifications

use crate::plugins::baking::BakeMode;
use bevy::prelude::*;

// Unified lighting command pattern
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum LightingCommand {
    /// Ensure the named scenario exists, select it, and bake into it.
    /// `mode: None` defers to the configured default.
    BakeScenario {
        scenario: String,
        mode: Option<BakeMode>,
    },
    /// Switch every mesh in the world to probe-sampled GI.
    ConvertMeshesToProbeGi,
}

/// Sent once, on the update where the probe-volume backend first reports
/// itself fully usable.
#[derive(Event, Debug, Clone, Copy)]
pub struct ProbeVolumesReady;
