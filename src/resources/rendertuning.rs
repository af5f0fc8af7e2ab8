//! Render-tuning settings owned by the default scene layer.
//!
//! Holds the colour-grading LUT paths and the toggles a renderer would read
//! each frame. Nothing here decodes textures; paths are passed through as-is.

use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// One of the three colour-grading lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutSlot {
    Warm,
    Cool,
    Custom,
}

impl LutSlot {
    pub const ALL: [LutSlot; 3] = [LutSlot::Warm, LutSlot::Cool, LutSlot::Custom];

    pub fn label(self) -> &'static str {
        match self {
            LutSlot::Warm => "Warm LUT",
            LutSlot::Cool => "Cool LUT",
            LutSlot::Custom => "Custom LUT",
        }
    }
}

/// LUT file locations, each optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LutPaths {
    pub warm: Option<PathBuf>,
    pub cool: Option<PathBuf>,
    pub custom: Option<PathBuf>,
}

impl LutPaths {
    pub fn get(&self, slot: LutSlot) -> Option<&PathBuf> {
        match slot {
            LutSlot::Warm => self.warm.as_ref(),
            LutSlot::Cool => self.cool.as_ref(),
            LutSlot::Custom => self.custom.as_ref(),
        }
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RenderTuning {
    pub luts: LutPaths,
    pub warm_enabled: bool,
    pub cool_enabled: bool,
    pub custom_enabled: bool,
    pub diffuse_wrap_enabled: bool,
    pub specular_wrap_enabled: bool,
}

impl RenderTuning {
    pub fn lut_enabled(&self, slot: LutSlot) -> bool {
        match slot {
            LutSlot::Warm => self.warm_enabled,
            LutSlot::Cool => self.cool_enabled,
            LutSlot::Custom => self.custom_enabled,
        }
    }

    pub fn toggle_lut(&mut self, slot: LutSlot) {
        let flag = match slot {
            LutSlot::Warm => &mut self.warm_enabled,
            LutSlot::Cool => &mut self.cool_enabled,
            LutSlot::Custom => &mut self.custom_enabled,
        };
        *flag = !*flag;
    }

    /// The LUT a renderer should apply: the first enabled of warm, cool,
    /// custom. `None` when none is enabled.
    pub fn active_lut(&self) -> Option<LutSlot> {
        LutSlot::ALL.into_iter().find(|slot| self.lut_enabled(*slot))
    }

    /// Path of the active LUT, if it has one.
    pub fn active_lut_path(&self) -> Option<&PathBuf> {
        self.active_lut().and_then(|slot| self.luts.get(slot))
    }

    pub fn render_imgui(&mut self, ui: &imgui::Ui) {
        ui.checkbox(LutSlot::Warm.label(), &mut self.warm_enabled);
        ui.checkbox(LutSlot::Cool.label(), &mut self.cool_enabled);
        ui.checkbox(LutSlot::Custom.label(), &mut self.custom_enabled);
        ui.separator();
        ui.checkbox("Diffuse wrap", &mut self.diffuse_wrap_enabled);
        ui.checkbox("Specular wrap", &mut self.specular_wrap_enabled);
        match self.active_lut_path() {
            Some(path) => ui.text(format!("Active LUT: {}", path.display())),
            None => ui.text("Active LUT: none"),
        }
    }
}
