//! Application host.
//!
//! [`Application`] owns the ECS world, the per-frame schedule and the stack
//! of [`ApplicationLayer`]s. A frame is:
//!
//! 1. advance [`WorldTime`] by the caller's delta,
//! 2. run the schedule: `update_input_state` then `scene_update`,
//! 3. call `on_update` on every layer in insertion order,
//! 4. clear change trackers.
//!
//! The input backend lives in the world as a non-send [`InputDriver`], so
//! the same loop runs headless (scripted input) or behind a real window.

use bevy_ecs::prelude::*;
use log::info;
use serde_json::Value;

use crate::error::{LoadError, Result};
use crate::layers::ApplicationLayer;
use crate::resources::activescene::ActiveScene;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::scene::graph::Scene;
use crate::scene::registry::ComponentRegistry;
use crate::systems::input::{InputBackend, InputDriver, update_input_state};
use crate::systems::scene::scene_update;
use crate::systems::time::update_world_time;

pub struct Application {
    world: World,
    update: Schedule,
    layers: Vec<Box<dyn ApplicationLayer>>,
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    /// World with default resources, idle input and no layers.
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(ComponentRegistry::with_builtin());
        world.insert_non_send_resource(InputDriver::idle());

        let mut update = Schedule::default();
        update.add_systems((update_input_state, scene_update).chain());

        Self {
            world,
            update,
            layers: Vec::new(),
        }
    }

    /// Replace the input backend.
    pub fn with_input(mut self, backend: impl InputBackend + 'static) -> Self {
        self.world.insert_non_send_resource(InputDriver::new(backend));
        self
    }

    pub fn with_layer(mut self, layer: impl ApplicationLayer + 'static) -> Self {
        self.push_layer(layer);
        self
    }

    pub fn push_layer(&mut self, layer: impl ApplicationLayer + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Hand `config` to every layer, then build the schedule.
    pub fn load(&mut self, config: &Value) -> Result<()> {
        for layer in self.layers.iter_mut() {
            info!("Loading layer {}", layer.name());
            layer.on_app_load(&mut self.world, config)?;
        }
        self.update
            .initialize(&mut self.world)
            .map_err(|e| LoadError::Schedule(format!("{e:?}")))?;
        Ok(())
    }

    /// Advance one frame by `dt` seconds.
    pub fn frame(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
        for layer in self.layers.iter_mut() {
            layer.on_update(&mut self.world);
        }
        self.world.clear_trackers();
    }

    /// Draw every layer's debug widgets into the current imgui frame.
    pub fn render_imgui(&mut self, ui: &imgui::Ui) {
        for layer in self.layers.iter_mut() {
            layer.render_imgui(&mut self.world, ui);
        }
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.world.get_resource::<ActiveScene>().map(|s| &s.0)
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.world
            .get_resource_mut::<ActiveScene>()
            .map(|s| &mut s.into_inner().0)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
