//! Lighting-scenario bake trigger and probe-GI mesh conversion
//!
//! This module contains the best-effort bake surface: ensure a named lighting
//! scenario exists on the backend's baking set, select it, and invoke a bake
//! into it. Operations report failure through their return value and a
//! warning log; nothing here panics on a misconfigured backend.

use crate::backend::{ProbeVolumeBackend, ProbeVolumeHandle};
use crate::components::{LightProbeUsage, ReceiveGi};
use crate::config::BakerConfig;
use crate::events::LightingCommand;
use crate::plugins::ProbeBakeSet;
use bevy::platform::time::Instant;
use bevy::prelude::*;

/// How a bake call relates to the bake's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeMode {
    /// Run the bake to completion before returning.
    Blocking,
    /// Launch the bake and return once it is underway. Completion is never
    /// reported back; the logged duration covers the launch only.
    Detached,
}

pub struct ProbeBakePlugin {
    config: Option<BakerConfig>,
}

impl ProbeBakePlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: BakerConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for ProbeBakePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ProbeBakePlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(BakerConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        app.insert_resource(config);

        app.add_event::<LightingCommand>();

        app.configure_sets(
            Update,
            (ProbeBakeSet::Poll, ProbeBakeSet::Dispatch).chain(),
        );

        app.add_systems(
            Update,
            (handle_bake_commands, handle_convert_commands).in_set(ProbeBakeSet::Dispatch),
        );
    }
}

/// Ensures `scenario` exists on the backend's baking set and selects it as
/// the current lighting scenario. Adding a name that already exists is a
/// no-op; selection happens either way.
///
/// Returns `false` without touching the backend when no baking set is
/// assigned.
pub fn apply_lighting_scenario(backend: &mut dyn ProbeVolumeBackend, scenario: &str) -> bool {
    match backend.baking_set_mut() {
        Some(baking_set) => {
            baking_set.try_add_scenario(scenario);
        }
        None => {
            warn!(
                "No baking set found. Ensure the probe volumes are initialized and a baking set is created."
            );
            return false;
        }
    }

    backend.set_lighting_scenario(scenario);
    true
}

/// Ensures `scenario` exists, selects it, and invokes a bake into it.
///
/// Returns `false` when the backend is already baking, when the scenario
/// could not be applied, or when the backend refuses the bake. An empty
/// scenario name draws a warning but is passed through to the backend
/// unchanged.
pub fn bake_lighting_scenario(
    backend: &mut dyn ProbeVolumeBackend,
    scenario: &str,
    mode: BakeMode,
) -> bool {
    // Best-effort guard. A bake can still begin between this check and the
    // bake call below; the backend arbitrates that race.
    if backend.is_baking() {
        return false;
    }

    if scenario.is_empty() {
        warn!("Scenario name cannot be empty.");
    }

    if !apply_lighting_scenario(backend, scenario) {
        warn!(
            "Failed to add or apply lighting scenario '{}'. Ensure the probe volumes are initialized and a baking set is created.",
            scenario
        );
        return false;
    }

    let start = Instant::now();
    let result = match mode {
        BakeMode::Blocking => backend.bake(),
        BakeMode::Detached => backend.bake_async(),
    };

    if result {
        info!(
            "Successfully baked scenario '{}' in {:.2} seconds.",
            scenario,
            start.elapsed().as_secs_f64()
        );
    }

    result
}

/// Switches meshes over to probe-sampled GI by inserting
/// [`ReceiveGi::LightProbes`] and [`LightProbeUsage::UseProxyVolume`],
/// replacing whatever GI markers they carried. Returns the number of meshes
/// converted.
pub fn convert_meshes_to_probe_gi(
    commands: &mut Commands,
    meshes: &Query<(Entity, &Visibility), With<Mesh3d>>,
    include_hidden: bool,
) -> usize {
    let mut converted = 0;
    for (entity, visibility) in meshes {
        if !include_hidden && matches!(visibility, Visibility::Hidden) {
            continue;
        }
        commands
            .entity(entity)
            .insert((ReceiveGi::LightProbes, LightProbeUsage::UseProxyVolume));
        converted += 1;
    }

    info!(
        "Converted {} meshes to receive GI from probe volumes.",
        converted
    );

    converted
}

/// Run condition: the installed backend reports a bake in flight.
pub fn bake_in_progress(handle: Option<Res<ProbeVolumeHandle>>) -> bool {
    handle.is_some_and(|handle| handle.is_baking())
}

pub fn handle_bake_commands(
    mut commands_reader: EventReader<LightingCommand>,
    mut handle: Option<ResMut<ProbeVolumeHandle>>,
    config: Res<BakerConfig>,
) {
    for command in commands_reader.read() {
        let LightingCommand::BakeScenario { scenario, mode } = command else {
            continue;
        };

        let Some(handle) = handle.as_mut() else {
            warn!(
                "No probe volume backend installed. Ignoring bake command for scenario '{}'.",
                scenario
            );
            continue;
        };

        let mode = mode.unwrap_or(if config.bake.detached {
            BakeMode::Detached
        } else {
            BakeMode::Blocking
        });

        bake_lighting_scenario(handle.0.as_mut(), scenario, mode);
    }
}

pub fn handle_convert_commands(
    mut commands_reader: EventReader<LightingCommand>,
    mut commands: Commands,
    meshes: Query<(Entity, &Visibility), With<Mesh3d>>,
    config: Res<BakerConfig>,
) {
    for command in commands_reader.read() {
        if !matches!(command, LightingCommand::ConvertMeshesToProbeGi) {
            continue;
        }
        convert_meshes_to_probe_gi(&mut commands, &meshes, config.conversion.include_hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BakingSet;
    use crate::test_utils::ScriptedProbeVolume;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_apply_without_baking_set_fails() {
        let mut volume = ScriptedProbeVolume {
            initialized: true,
            ..ScriptedProbeVolume::default()
        };

        assert!(!apply_lighting_scenario(&mut volume, "Night"));
        assert_eq!(volume.scenario, "");
    }

    #[test]
    fn test_apply_adds_and_selects_scenario() {
        let mut volume = ScriptedProbeVolume::usable();

        assert!(apply_lighting_scenario(&mut volume, "Night"));
        assert_eq!(volume.scenario, "Night");
        assert!(volume.baking_set.as_ref().unwrap().contains_scenario("Night"));
    }

    #[test]
    fn test_apply_existing_scenario_selects_without_duplicating() {
        let mut volume = ScriptedProbeVolume::usable();
        volume.baking_set.as_mut().unwrap().try_add_scenario("Night");

        assert!(apply_lighting_scenario(&mut volume, "Night"));
        assert_eq!(volume.scenario, "Night");
        assert_eq!(volume.baking_set.as_ref().unwrap().scenarios.len(), 1);
    }

    #[test]
    fn test_bake_refused_while_backend_busy() {
        let mut volume = ScriptedProbeVolume::usable();
        volume.baking = true;
        let bakes = volume.bakes.clone();

        assert!(!bake_lighting_scenario(&mut volume, "Night", BakeMode::Blocking));
        assert_eq!(bakes.load(Ordering::SeqCst), 0);
        // Refused before the scenario was touched
        assert_eq!(volume.scenario, "");
    }

    #[test]
    fn test_bake_with_empty_name_proceeds() {
        let mut volume = ScriptedProbeVolume::usable();
        let bakes = volume.bakes.clone();

        assert!(bake_lighting_scenario(&mut volume, "", BakeMode::Blocking));
        assert_eq!(bakes.load(Ordering::SeqCst), 1);
        assert_eq!(volume.scenario, "");
        assert!(volume.baking_set.as_ref().unwrap().contains_scenario(""));
    }

    #[test]
    fn test_blocking_bake_uses_synchronous_entry() {
        let mut volume = ScriptedProbeVolume::usable();
        let bakes = volume.bakes.clone();
        let async_bakes = volume.async_bakes.clone();

        assert!(bake_lighting_scenario(&mut volume, "Day", BakeMode::Blocking));
        assert_eq!(bakes.load(Ordering::SeqCst), 1);
        assert_eq!(async_bakes.load(Ordering::SeqCst), 0);
        assert_eq!(volume.scenario, "Day");
    }

    #[test]
    fn test_detached_bake_uses_async_entry() {
        let mut volume = ScriptedProbeVolume::usable();
        let bakes = volume.bakes.clone();
        let async_bakes = volume.async_bakes.clone();

        assert!(bake_lighting_scenario(&mut volume, "Day", BakeMode::Detached));
        assert_eq!(async_bakes.load(Ordering::SeqCst), 1);
        assert_eq!(bakes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detached_bake_returns_while_bake_runs() {
        let mut volume = ScriptedProbeVolume::usable();

        assert!(bake_lighting_scenario(&mut volume, "Day", BakeMode::Detached));
        // The call came back while the backend still reports the bake in
        // flight, so a second trigger is refused as busy.
        assert!(volume.is_baking());
        assert!(!bake_lighting_scenario(&mut volume, "Dusk", BakeMode::Detached));
        assert_eq!(volume.async_bakes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refused_bake_returns_false() {
        let mut volume = ScriptedProbeVolume::usable();
        volume.bake_result = false;
        let bakes = volume.bakes.clone();

        assert!(!bake_lighting_scenario(&mut volume, "Night", BakeMode::Blocking));
        // The backend was still asked; the refusal came from it
        assert_eq!(bakes.load(Ordering::SeqCst), 1);
        // No rollback: the scenario selection stays applied
        assert_eq!(volume.scenario, "Night");
    }

    #[test]
    fn test_failed_apply_aborts_before_bake() {
        let mut volume = ScriptedProbeVolume {
            initialized: true,
            ..ScriptedProbeVolume::default()
        };
        let bakes = volume.bakes.clone();
        let async_bakes = volume.async_bakes.clone();

        assert!(!bake_lighting_scenario(&mut volume, "Night", BakeMode::Blocking));
        assert_eq!(bakes.load(Ordering::SeqCst), 0);
        assert_eq!(async_bakes.load(Ordering::SeqCst), 0);
    }
}
