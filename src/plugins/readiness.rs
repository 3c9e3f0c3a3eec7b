//! Probe-volume readiness latch
//!
//! The backend initializes on its own schedule, and there is no signal to
//! subscribe to; the only way to learn that it became usable is to ask it
//! every frame. This plugin does the asking. It polls the installed
//! [`ProbeVolumeHandle`] each update, and on the first frame the backend
//! reports initialized with a baking set assigned it latches
//! [`ProbeVolumeReadiness`], sends [`ProbeVolumesReady`], and runs the pending
//! callback if one was registered.

use crate::backend::ProbeVolumeHandle;
use crate::events::ProbeVolumesReady;
use crate::plugins::ProbeBakeSet;
use bevy::ecs::system::SystemId;
use bevy::prelude::*;

/// Latched readiness state of the probe-volume backend.
///
/// Starts not-ready and stays that way until a poll observes a usable
/// backend. Once latched it no longer consults the backend; [`reset`] is the
/// only way back.
///
/// [`reset`]: ProbeVolumeReadiness::reset
#[derive(Resource, Debug, Default)]
pub struct ProbeVolumeReadiness {
    ready: bool,
    pending: Option<SystemId>,
}

impl ProbeVolumeReadiness {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn has_pending_callback(&self) -> bool {
        self.pending.is_some()
    }

    /// Clears the latch and any callback still waiting on it. The next poll
    /// against a usable backend latches and notifies again.
    pub fn reset(&mut self) {
        self.ready = false;
        self.pending = None;
    }
}

pub struct ProbeVolumeReadinessPlugin;

impl Plugin for ProbeVolumeReadinessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProbeVolumeReadiness>();
        app.add_event::<ProbeVolumesReady>();
        app.configure_sets(
            Update,
            (ProbeBakeSet::Poll, ProbeBakeSet::Dispatch).chain(),
        );
        app.add_systems(Update, poll_probe_volumes.in_set(ProbeBakeSet::Poll));
    }
}

/// Polls the backend once per update and latches on the first frame it is
/// fully usable. Initialization alone is not enough; a baking set must also
/// be assigned before bakes can mean anything.
pub fn poll_probe_volumes(
    handle: Option<Res<ProbeVolumeHandle>>,
    mut readiness: ResMut<ProbeVolumeReadiness>,
    mut ready_events: EventWriter<ProbeVolumesReady>,
    mut commands: Commands,
) {
    if readiness.ready {
        return;
    }

    let Some(handle) = handle else {
        return;
    };

    if handle.is_initialized() && handle.baking_set().is_some() {
        readiness.ready = true;
        ready_events.write(ProbeVolumesReady);

        if let Some(callback) = readiness.pending.take() {
            commands.queue(move |world: &mut World| run_ready_callback(world, callback));
        }
    }
}

/// Run condition: the readiness latch has fired.
pub fn probe_volumes_ready(readiness: Res<ProbeVolumeReadiness>) -> bool {
    readiness.ready
}

/// Registration surface for readiness callbacks.
///
/// Callbacks are one-shot systems, registered up front with
/// `World::register_system` and identified by their [`SystemId`].
pub trait ReadinessExt {
    /// Arranges for `callback` to run once the probe volumes become ready.
    ///
    /// There is a single callback slot. Registering while another callback is
    /// still waiting replaces it; only the most recent registration runs. If
    /// the volumes are already ready the callback runs right away (for
    /// `World`, before this call returns; for `Commands`, when they apply).
    fn on_probe_volumes_ready(&mut self, callback: SystemId);
}

impl ReadinessExt for World {
    fn on_probe_volumes_ready(&mut self, callback: SystemId) {
        {
            let Some(mut readiness) = self.get_resource_mut::<ProbeVolumeReadiness>() else {
                warn!("ProbeVolumeReadinessPlugin is not installed. Dropping readiness callback.");
                return;
            };
            if !readiness.ready {
                // Single slot. A later registration replaces the earlier one.
                readiness.pending = Some(callback);
                return;
            }
        }
        run_ready_callback(self, callback);
    }
}

impl ReadinessExt for Commands<'_, '_> {
    fn on_probe_volumes_ready(&mut self, callback: SystemId) {
        self.queue(move |world: &mut World| world.on_probe_volumes_ready(callback));
    }
}

fn run_ready_callback(world: &mut World, callback: SystemId) {
    if let Err(e) = world.run_system(callback) {
        warn!("Probe volume readiness callback failed to run: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_defaults_to_not_ready() {
        let readiness = ProbeVolumeReadiness::default();
        assert!(!readiness.is_ready());
        assert!(!readiness.has_pending_callback());
    }

    #[test]
    fn test_reset_clears_latch_and_pending_callback() {
        let mut world = World::new();
        let callback = world.register_system(|| {});

        let mut readiness = ProbeVolumeReadiness {
            ready: true,
            pending: Some(callback),
        };
        readiness.reset();

        assert!(!readiness.is_ready());
        assert!(!readiness.has_pending_callback());
    }

    #[test]
    fn test_registration_without_plugin_is_dropped() {
        let mut world = World::new();
        let callback = world.register_system(|| {});

        // No ProbeVolumeReadiness resource installed
        world.on_probe_volumes_ready(callback);
        assert!(world.get_resource::<ProbeVolumeReadiness>().is_none());
    }
}
