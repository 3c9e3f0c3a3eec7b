//! Components attached to meshes participating in probe-lit GI

use bevy::prelude::*;

/// How a mesh receives global illumination.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiveGi {
    /// Sample baked lightmaps.
    #[default]
    Lightmaps,
    /// Sample the light-probe field instead of lightmaps.
    LightProbes,
}

/// Which probe source a mesh samples when it receives GI from probes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightProbeUsage {
    #[default]
    BlendProbes,
    /// Sample the probe proxy volume covering the mesh.
    UseProxyVolume,
}
