//! On-disk JSON layout of scenes and helpers for reading component blobs.
//!
//! A scene file is an object with a name and a list of game objects; each game
//! object lists its components as `{ "type": <name>, "data": <blob> }` pairs,
//! where `data` is exactly what the component's `to_json` produced.
//!
//! ```json
//! {
//!   "name": "Default",
//!   "objects": [
//!     {
//!       "name": "player",
//!       "position": [0.0, 0.0, 1.0],
//!       "components": [
//!         { "type": "RigidBody", "data": { "mass": 1.0, "type": "dynamic" } },
//!         { "type": "MovementBehaviour", "data": { "speed": 0.05 } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LoadError, Result};

/// A single component entry inside a serialized game object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SerializedComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub data: Value,
    /// Only written when the component was disabled by hand.
    #[serde(default = "default_enabled", skip_serializing_if = "is_true")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SerializedObject {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub components: Vec<SerializedComponent>,
}

/// Scene file format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneFormat {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<SerializedObject>,
}

impl Default for SceneFormat {
    fn default() -> Self {
        Self {
            name: "no_name".to_string(),
            objects: Vec::new(),
        }
    }
}

/// Fetch a required key from a component blob.
pub fn require<'a>(blob: &'a Value, component: &str, field: &'static str) -> Result<&'a Value> {
    blob.get(field).ok_or_else(|| LoadError::MissingField {
        component: component.to_string(),
        field,
    })
}

/// Fetch a required numeric key as `f32`. Values outside the `f32` range
/// are rejected rather than saturated to infinity.
pub fn require_f32(blob: &Value, component: &str, field: &'static str) -> Result<f32> {
    let value = require(blob, component, field)?
        .as_f64()
        .ok_or_else(|| LoadError::InvalidField {
            component: component.to_string(),
            field,
            expected: "a number",
        })?;
    let narrowed = value as f32;
    if !narrowed.is_finite() {
        return Err(LoadError::InvalidField {
            component: component.to_string(),
            field,
            expected: "a finite number",
        });
    }
    Ok(narrowed)
}

/// Fetch a required string key.
pub fn require_str<'a>(blob: &'a Value, component: &str, field: &'static str) -> Result<&'a str> {
    require(blob, component, field)?
        .as_str()
        .ok_or_else(|| LoadError::InvalidField {
            component: component.to_string(),
            field,
            expected: "a string",
        })
}
