//! Application layers.
//!
//! A layer is a unit of application logic hooked into the frame loop. The
//! [`Application`](crate::app::Application) calls every layer in insertion
//! order: `on_app_load` once at startup, `on_update` once per frame after the
//! scene has updated, and `render_imgui` when a debug UI frame is drawn.
//!
//! Submodules overview
//! - [`defaultscene`] – builds or loads the sample scene and owns render tuning

pub mod defaultscene;

use bevy_ecs::prelude::*;
use serde_json::Value;

use crate::error::Result;

pub trait ApplicationLayer {
    fn name(&self) -> &str;

    /// Called once with the layer's JSON configuration (`Value::Null` when
    /// none was provided). Errors abort application startup.
    fn on_app_load(&mut self, world: &mut World, config: &Value) -> Result<()>;

    /// Called every frame after the scene update.
    fn on_update(&mut self, _world: &mut World) {}

    /// Draw the layer's debug widgets.
    fn render_imgui(&mut self, _world: &mut World, _ui: &imgui::Ui) {}
}
