//! Scene update system.
//!
//! Drives the [`ActiveScene`] one frame forward using this frame's input
//! snapshot and scaled delta. Ordered after
//! [`update_input_state`](crate::systems::input::update_input_state) so every
//! component reads the same, already-updated input.
use bevy_ecs::prelude::*;
use log::trace;

use crate::resources::activescene::ActiveScene;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

pub fn scene_update(
    scene: Option<ResMut<ActiveScene>>,
    input: Res<InputState>,
    time: Res<WorldTime>,
) {
    let Some(mut scene) = scene else {
        return;
    };
    let updated = scene.update(&input, time.delta);
    trace!("Frame {}: {} component updates", time.frame_count, updated);
}
