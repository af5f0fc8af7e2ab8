//! Input systems.
//!
//! - [`InputBackend`] is the seam to whatever produces raw input samples.
//!   [`ScriptedInput`] replays a JSON script and [`IdleInput`] reports
//!   nothing held; a windowed backend would implement the same trait.
//! - [`update_input_state`] polls the backend once per frame and writes the
//!   sample into [`InputState`], which derives the edge states.
use std::ops::RangeInclusive;
use std::path::Path;

use bevy_ecs::prelude::*;
use log::{debug, info};
use serde::Deserialize;

use crate::error::{LoadError, Result};
use crate::resources::input::{InputState, Key, MouseButton, RawInput};

/// Source of raw input samples.
pub trait InputBackend {
    /// Sample for frame `frame` (0-based).
    fn poll(&mut self, frame: u64) -> RawInput;
}

/// Backend that never reports anything held.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleInput;

impl InputBackend for IdleInput {
    fn poll(&mut self, _frame: u64) -> RawInput {
        RawInput::default()
    }
}

/// One entry of an input script: the listed keys and buttons are held on
/// every frame in `from..=to`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptedSpan {
    pub from: u64,
    pub to: u64,
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default)]
    pub mouse: Vec<MouseButton>,
}

impl ScriptedSpan {
    fn frames(&self) -> RangeInclusive<u64> {
        self.from..=self.to
    }
}

/// Replays a list of held-input spans. Overlapping spans combine.
///
/// ```json
/// [
///   { "from": 0, "to": 29, "keys": ["W"] },
///   { "from": 10, "to": 12, "mouse": ["Left"] }
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedInput {
    spans: Vec<ScriptedSpan>,
}

impl ScriptedInput {
    pub fn new(spans: Vec<ScriptedSpan>) -> Self {
        Self { spans }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let spans: Vec<ScriptedSpan> = Vec::deserialize(value)?;
        Ok(Self::new(spans))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let spans: Vec<ScriptedSpan> = serde_json::from_str(&contents)?;
        info!(
            "Loaded input script with {} spans from {}",
            spans.len(),
            path.display()
        );
        Ok(Self::new(spans))
    }

    /// Last frame any span covers.
    pub fn last_frame(&self) -> Option<u64> {
        self.spans.iter().map(|s| s.to).max()
    }
}

impl InputBackend for ScriptedInput {
    fn poll(&mut self, frame: u64) -> RawInput {
        let mut raw = RawInput::default();
        for span in self.spans.iter().filter(|s| s.frames().contains(&frame)) {
            raw.keys_down.extend(span.keys.iter().copied());
            raw.mouse_down.extend(span.mouse.iter().copied());
        }
        raw
    }
}

/// Non-send resource wrapping the active backend.
pub struct InputDriver {
    backend: Box<dyn InputBackend>,
    next_frame: u64,
}

impl InputDriver {
    pub fn new(backend: impl InputBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            next_frame: 0,
        }
    }

    pub fn idle() -> Self {
        Self::new(IdleInput)
    }

    /// Poll the backend for the next frame's sample.
    pub fn next_sample(&mut self) -> RawInput {
        let raw = self.backend.poll(self.next_frame);
        self.next_frame += 1;
        raw
    }
}

/// Poll the input backend and update the `InputState` resource.
pub fn update_input_state(mut input: ResMut<InputState>, mut driver: NonSendMut<InputDriver>) {
    let raw = driver.next_sample();
    if !raw.keys_down.is_empty() || !raw.mouse_down.is_empty() {
        debug!(
            "Frame {}: keys {:?}, mouse {:?}",
            input.frame(),
            raw.keys_down,
            raw.mouse_down
        );
    }
    input.apply_snapshot(&raw);
}
