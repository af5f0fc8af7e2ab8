//! Registry mapping component type names to JSON factories.
//!
//! Scene loading never switches over concrete types. Each component type
//! registers its [`ComponentType::from_json`] under [`ComponentType::TYPE_NAME`]
//! once at startup, and the loader looks factories up by the `"type"` tag of
//! each serialized component. New behaviours only need to be registered.

use bevy_ecs::prelude::*;
use log::debug;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::components::behaviour::{ComponentType, GameComponent};
use crate::components::movementbehaviour::MovementBehaviour;
use crate::components::rigidbody::RigidBody;
use crate::error::{LoadError, Result};

type Factory = fn(&Value) -> Result<Box<dyn GameComponent>>;

fn build<T: ComponentType>(blob: &Value) -> Result<Box<dyn GameComponent>> {
    Ok(Box::new(T::from_json(blob)?))
}

/// Type-name → factory table. Inserted into the ECS world as a resource so
/// layers can load scenes.
#[derive(Resource, Default)]
pub struct ComponentRegistry {
    factories: FxHashMap<&'static str, Factory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every component type this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register::<RigidBody>()
            .register::<MovementBehaviour>();
        registry
    }

    /// Register `T` under its type name, replacing any earlier entry.
    pub fn register<T: ComponentType>(&mut self) -> &mut Self {
        if self.factories.insert(T::TYPE_NAME, build::<T>).is_some() {
            debug!("Re-registered component type {}", T::TYPE_NAME);
        }
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build a component of the named type from its JSON blob.
    pub fn create(&self, type_name: &str, blob: &Value) -> Result<Box<dyn GameComponent>> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| LoadError::UnknownComponentType(type_name.to_string()))?;
        factory(blob)
    }
}
