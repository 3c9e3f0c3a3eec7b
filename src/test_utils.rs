//! Test utilities for plugin testing

use crate::backend::{BakingSet, ProbeVolumeBackend};
use crate::prelude::*;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Creates a minimal test app with this crate's plugins installed
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);

    // Default config rather than whatever is on the host machine
    app.add_plugins((
        ProbeVolumeReadinessPlugin,
        ProbeBakePlugin::with_config(BakerConfig::default()),
    ));

    app
}

/// Baking set backed by a plain scenario list.
#[derive(Debug, Default, Clone)]
pub struct ScriptedBakingSet {
    pub scenarios: Vec<String>,
}

impl BakingSet for ScriptedBakingSet {
    fn try_add_scenario(&mut self, name: &str) -> bool {
        if self.contains_scenario(name) {
            return false;
        }
        self.scenarios.push(name.to_string());
        true
    }

    fn contains_scenario(&self, name: &str) -> bool {
        self.scenarios.iter().any(|scenario| scenario == name)
    }
}

/// Scripted probe-volume backend.
///
/// Tests flip the public fields to walk the backend through its lifecycle and
/// read the shared counters to observe bake calls after the volume has been
/// boxed into a [`ProbeVolumeHandle`]. `bake_async` leaves the volume
/// reporting busy, the way a real backend does while a detached bake runs.
pub struct ScriptedProbeVolume {
    pub initialized: bool,
    pub baking_set: Option<ScriptedBakingSet>,
    pub scenario: String,
    pub baking: bool,
    /// What `bake` and `bake_async` report back.
    pub bake_result: bool,
    pub bakes: Arc<AtomicUsize>,
    pub async_bakes: Arc<AtomicUsize>,
}

impl Default for ScriptedProbeVolume {
    fn default() -> Self {
        Self {
            initialized: false,
            baking_set: None,
            scenario: String::new(),
            baking: false,
            bake_result: true,
            bakes: Arc::new(AtomicUsize::new(0)),
            async_bakes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ScriptedProbeVolume {
    /// A volume that reports usable from the first poll, with an empty
    /// baking set assigned.
    pub fn usable() -> Self {
        Self {
            initialized: true,
            baking_set: Some(ScriptedBakingSet::default()),
            ..Self::default()
        }
    }
}

impl ProbeVolumeBackend for ScriptedProbeVolume {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn baking_set(&self) -> Option<&dyn BakingSet> {
        self.baking_set.as_ref().map(|set| set as &dyn BakingSet)
    }

    fn baking_set_mut(&mut self) -> Option<&mut dyn BakingSet> {
        self.baking_set.as_mut().map(|set| set as &mut dyn BakingSet)
    }

    fn lighting_scenario(&self) -> &str {
        &self.scenario
    }

    fn set_lighting_scenario(&mut self, name: &str) {
        self.scenario = name.to_string();
    }

    fn is_baking(&self) -> bool {
        self.baking
    }

    fn bake(&mut self) -> bool {
        self.bakes.fetch_add(1, Ordering::SeqCst);
        self.bake_result
    }

    fn bake_async(&mut self) -> bool {
        self.async_bakes.fetch_add(1, Ordering::SeqCst);
        if self.bake_result {
            self.baking = true;
        }
        self.bake_result
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Installs `volume` as the app's backend, returning its bake counters
/// (blocking, detached) for later assertions.
pub fn install_scripted_volume(
    app: &mut App,
    volume: ScriptedProbeVolume,
) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let bakes = volume.bakes.clone();
    let async_bakes = volume.async_bakes.clone();
    app.insert_resource(ProbeVolumeHandle::new(volume));
    (bakes, async_bakes)
}

/// Mutable access to the scripted volume installed in `world`.
pub fn scripted_volume_mut(world: &mut World) -> &mut ScriptedProbeVolume {
    world
        .resource_mut::<ProbeVolumeHandle>()
        .into_inner()
        .0
        .as_any_mut()
        .downcast_mut::<ScriptedProbeVolume>()
        .expect("installed backend is not a ScriptedProbeVolume")
}
