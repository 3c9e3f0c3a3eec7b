pub mod baking;
pub mod readiness;

use bevy::prelude::*;

/// Update-schedule ordering shared by the probe plugins: readiness polling
/// latches before command dispatch runs, so work queued by a readiness
/// callback is handled the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProbeBakeSet {
    Poll,
    Dispatch,
}
