//! The scene: an ordered collection of game objects and the per-frame
//! traversal over them.

use std::path::Path;

use log::{debug, info};
use nalgebra::Vector3;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoadError, Result};
use crate::resources::input::InputState;
use crate::scene::format::{SceneFormat, SerializedComponent, SerializedObject};
use crate::scene::gameobject::{GameObject, GameObjectId};
use crate::scene::registry::ComponentRegistry;

/// Owns every game object in insertion order.
#[derive(Debug)]
pub struct Scene {
    name: String,
    objects: Vec<GameObject>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneFormat::default().name)
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ========== Object management ==========

    /// Create an empty object at the end of the scene.
    pub fn create_object(&mut self, name: impl Into<String>) -> GameObjectId {
        self.add_object(GameObject::new(name))
    }

    pub fn add_object(&mut self, object: GameObject) -> GameObjectId {
        let id = object.id();
        self.objects.push(object);
        id
    }

    pub fn remove_object(&mut self, id: GameObjectId) -> Option<GameObject> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        Some(self.objects.remove(index))
    }

    pub fn object(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn object_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// First object with the given name.
    pub fn find_object_by_name(&self, name: &str) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn find_object_by_name_mut(&mut self, name: &str) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.name() == name)
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // ========== Lifecycle ==========

    /// Wake every component that has not been woken yet.
    pub fn awake(&mut self) -> usize {
        let awoken = self.objects.iter_mut().map(GameObject::awake_pending).sum();
        debug!("Scene '{}': awoke {} components", self.name, awoken);
        awoken
    }

    /// Advance one frame: objects in insertion order, components in
    /// attachment order, enabled components only. Returns the number of
    /// component updates that ran.
    pub fn update(&mut self, input: &InputState, delta_time: f32) -> usize {
        self.objects
            .iter_mut()
            .map(|object| object.update(input, delta_time))
            .sum()
    }

    // ========== Serialization ==========

    pub fn to_format(&self) -> SceneFormat {
        SceneFormat {
            name: self.name.clone(),
            objects: self
                .objects
                .iter()
                .map(|object| SerializedObject {
                    name: object.name().to_string(),
                    position: [object.position.x, object.position.y, object.position.z],
                    components: object
                        .components()
                        .map(|(_, component)| SerializedComponent {
                            component_type: component.type_name().to_string(),
                            data: component.to_json(),
                            enabled: component.is_enabled(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Build a scene from its serialized form. Any component that fails to
    /// load fails the whole scene.
    pub fn from_format(format: &SceneFormat, registry: &ComponentRegistry) -> Result<Self> {
        let mut scene = Scene::new(format.name.clone());
        for serialized in &format.objects {
            let [x, y, z] = serialized.position;
            let mut object =
                GameObject::new(serialized.name.clone()).with_position(Vector3::new(x, y, z));
            for entry in &serialized.components {
                let mut component = registry.create(&entry.component_type, &entry.data)?;
                component.set_enabled(entry.enabled);
                object.add_boxed(component);
            }
            scene.add_object(object);
        }
        Ok(scene)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.to_format())?)
    }

    pub fn from_json(value: &Value, registry: &ComponentRegistry) -> Result<Self> {
        let format = SceneFormat::deserialize(value)
            .map_err(|e| LoadError::MalformedScene(e.to_string()))?;
        Self::from_format(&format, registry)
    }

    pub fn load_from_file(path: impl AsRef<Path>, registry: &ComponentRegistry) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let value: Value = serde_json::from_str(&contents)?;
        let scene = Self::from_json(&value, registry)?;
        info!(
            "Loaded scene '{}' ({} objects) from {}",
            scene.name,
            scene.object_count(),
            path.display()
        );
        Ok(scene)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(&self.to_format())?;
        std::fs::write(path, contents).map_err(|e| LoadError::io(path, e))?;
        info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    // ========== Debug UI ==========

    /// One tree node per object, components inside.
    pub fn render_imgui(&mut self, ui: &imgui::Ui) {
        ui.text(format!("Scene: {} ({} objects)", self.name, self.objects.len()));
        for object in self.objects.iter_mut() {
            let _id = ui.push_id(object.id().to_string().as_str());
            if let Some(_node) = ui.tree_node(object.name()) {
                object.render_imgui(ui);
            }
        }
    }
}
