//! Application configuration resource.
//!
//! Settings for the headless frame loop, loaded from an INI file. Every key is
//! optional; missing keys keep their defaults, and command-line flags are
//! applied on top afterwards.
//!
//! # Configuration File Format
//!
//! ```ini
//! [app]
//! target_fps = 60
//! frames = 600
//! layer_config = ./layer.json
//! input_script = ./input.json
//! save_scene = ./out/scene.json
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_FRAMES: u64 = 300;
pub const DEFAULT_CONFIG_PATH: &str = "./config.ini";

const SECTION: &str = "app";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Frame rate the fixed timestep is derived from.
    pub target_fps: u32,
    /// Number of frames to run before exiting.
    pub frames: u64,
    /// JSON file configuring the default scene layer.
    pub layer_config: Option<PathBuf>,
    /// JSON input script driving the headless backend.
    pub input_script: Option<PathBuf>,
    /// Where to write the scene after the last frame.
    pub save_scene: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            frames: DEFAULT_FRAMES,
            layer_config: None,
            input_script: None,
            save_scene: None,
        }
    }

    /// Fixed frame delta in seconds.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Apply command-line values on top of the loaded file. `None` keeps
    /// the file's value.
    pub fn apply_overrides(
        &mut self,
        frames: Option<u64>,
        layer_config: Option<PathBuf>,
        input_script: Option<PathBuf>,
        save_scene: Option<PathBuf>,
    ) {
        if let Some(frames) = frames {
            self.frames = frames;
        }
        if layer_config.is_some() {
            self.layer_config = layer_config;
        }
        if input_script.is_some() {
            self.input_script = input_script;
        }
        if save_scene.is_some() {
            self.save_scene = save_scene;
        }
    }

    /// Load configuration from an INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        if let Some(fps) = config.getuint(SECTION, "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(frames) = config.getuint(SECTION, "frames").ok().flatten() {
            self.frames = frames;
        }
        if let Some(layer) = config.get(SECTION, "layer_config") {
            self.layer_config = Some(PathBuf::from(layer));
        }
        if let Some(script) = config.get(SECTION, "input_script") {
            self.input_script = Some(PathBuf::from(script));
        }
        if let Some(save) = config.get(SECTION, "save_scene") {
            self.save_scene = Some(PathBuf::from(save));
        }

        info!(
            "Loaded config from {}: fps={}, frames={}",
            path.display(),
            self.target_fps,
            self.frames
        );
        Ok(())
    }

    /// Save configuration to an INI file, creating it if needed.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let mut config = Ini::new();

        config.set(SECTION, "target_fps", Some(self.target_fps.to_string()));
        config.set(SECTION, "frames", Some(self.frames.to_string()));
        let optional = [
            ("layer_config", &self.layer_config),
            ("input_script", &self.input_script),
            ("save_scene", &self.save_scene),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                config.set(SECTION, key, Some(value.display().to_string()));
            }
        }

        config
            .write(path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", path);
        Ok(())
    }
}
