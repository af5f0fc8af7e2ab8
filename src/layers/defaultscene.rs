//! Default scene layer.
//!
//! Entry point for the sample scene. On load it reads its [`LayerConfig`],
//! publishes the render-tuning state as a [`RenderTuning`] resource and
//! either loads the configured scene file or builds the built-in test scene.
//! Each frame it maps the number keys onto the render-tuning toggles:
//!
//! | key | toggles                |
//! |-----|------------------------|
//! | 1   | warm LUT               |
//! | 2   | cool LUT               |
//! | 3   | custom LUT             |
//! | 4   | diffuse wrap lighting  |
//! | 5   | specular wrap lighting |
//!
//! Toggles react to the `Pressed` edge, so holding a key flips it once.

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::movementbehaviour::MovementBehaviour;
use crate::components::rigidbody::RigidBody;
use crate::error::Result;
use crate::layers::ApplicationLayer;
use crate::resources::activescene::ActiveScene;
use crate::resources::input::{ButtonState, InputState, Key};
use crate::resources::rendertuning::{LutPaths, LutSlot, RenderTuning};
use crate::scene::gameobject::GameObject;
use crate::scene::graph::Scene;
use crate::scene::registry::ComponentRegistry;

pub const DEFAULT_SCENE_NAME: &str = "Default";
pub const PLAYER_NAME: &str = "player";
pub const GROUND_NAME: &str = "ground";
const PLAYER_SPEED: f32 = 0.05;
const PLAYER_MASS: f32 = 1.0;

/// JSON configuration of the layer. Every key is optional.
///
/// ```json
/// {
///   "scene_path": "scenes/default.json",
///   "luts": { "warm": "luts/warm.cube", "cool": "luts/cool.cube" },
///   "warm_enabled": true
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LayerConfig {
    pub scene_path: Option<PathBuf>,
    pub luts: LutPaths,
    pub warm_enabled: bool,
    pub cool_enabled: bool,
    pub custom_enabled: bool,
    pub diffuse_wrap_enabled: bool,
    pub specular_wrap_enabled: bool,
}

impl LayerConfig {
    pub fn from_json(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }

    fn render_tuning(&self) -> RenderTuning {
        RenderTuning {
            luts: self.luts.clone(),
            warm_enabled: self.warm_enabled,
            cool_enabled: self.cool_enabled,
            custom_enabled: self.custom_enabled,
            diffuse_wrap_enabled: self.diffuse_wrap_enabled,
            specular_wrap_enabled: self.specular_wrap_enabled,
        }
    }
}

/// What a toggle key flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Lut(LutSlot),
    DiffuseWrap,
    SpecularWrap,
}

const TOGGLE_KEYS: [(Key, Toggle); 5] = [
    (Key::Num1, Toggle::Lut(LutSlot::Warm)),
    (Key::Num2, Toggle::Lut(LutSlot::Cool)),
    (Key::Num3, Toggle::Lut(LutSlot::Custom)),
    (Key::Num4, Toggle::DiffuseWrap),
    (Key::Num5, Toggle::SpecularWrap),
];

impl Toggle {
    fn apply(self, tuning: &mut RenderTuning) {
        match self {
            Toggle::Lut(slot) => tuning.toggle_lut(slot),
            Toggle::DiffuseWrap => tuning.diffuse_wrap_enabled = !tuning.diffuse_wrap_enabled,
            Toggle::SpecularWrap => {
                tuning.specular_wrap_enabled = !tuning.specular_wrap_enabled
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct DefaultSceneLayer {
    config: LayerConfig,
}

impl DefaultSceneLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// The built-in test scene: a static ground and a WASD-driven player.
    pub fn create_default_scene() -> Scene {
        let mut scene = Scene::new(DEFAULT_SCENE_NAME);
        scene.add_object(GameObject::new(GROUND_NAME).with_component(RigidBody::fixed()));
        scene.add_object(
            GameObject::new(PLAYER_NAME)
                .with_position(Vector3::new(0.0, 0.0, 1.0))
                .with_component(RigidBody::dynamic(PLAYER_MASS))
                .with_component(MovementBehaviour::new(PLAYER_SPEED)),
        );
        scene
    }
}

impl ApplicationLayer for DefaultSceneLayer {
    fn name(&self) -> &str {
        "DefaultSceneLayer"
    }

    fn on_app_load(&mut self, world: &mut World, config: &Value) -> Result<()> {
        self.config = LayerConfig::from_json(config)?;
        world.insert_resource(self.config.render_tuning());

        let mut scene = match &self.config.scene_path {
            Some(path) => match world.get_resource::<ComponentRegistry>() {
                Some(registry) => Scene::load_from_file(path, registry)?,
                None => Scene::load_from_file(path, &ComponentRegistry::with_builtin())?,
            },
            None => {
                info!("No scene_path configured; creating the default scene");
                Self::create_default_scene()
            }
        };
        scene.awake();
        info!(
            "Scene '{}' ready with {} objects",
            scene.name(),
            scene.object_count()
        );
        world.insert_resource(ActiveScene(scene));
        Ok(())
    }

    fn on_update(&mut self, world: &mut World) {
        let pressed: Vec<Toggle> = match world.get_resource::<InputState>() {
            Some(input) => TOGGLE_KEYS
                .iter()
                .filter(|(key, _)| input.key_state(*key) == ButtonState::Pressed)
                .map(|(_, toggle)| *toggle)
                .collect(),
            None => return,
        };
        if pressed.is_empty() {
            return;
        }
        let Some(mut tuning) = world.get_resource_mut::<RenderTuning>() else {
            return;
        };
        for toggle in pressed {
            toggle.apply(&mut tuning);
            info!("Toggled {:?}", toggle);
        }
    }

    fn render_imgui(&mut self, world: &mut World, ui: &imgui::Ui) {
        ui.window("Render tuning").build(|| {
            if let Some(mut tuning) = world.get_resource_mut::<RenderTuning>() {
                tuning.render_imgui(ui);
            }
        });
        ui.window("Scene").build(|| {
            if let Some(mut scene) = world.get_resource_mut::<ActiveScene>() {
                scene.render_imgui(ui);
            }
        });
    }
}
